//! Word-level text diff with a semantic cleanup pass.
//!
//! Text is split into word, whitespace and punctuation tokens and correlated
//! with the shortest-edit-script engine in [`crate::util::lcs`]. Short equal
//! stretches squeezed between two edits are then folded into those edits so
//! a rewritten sentence reads as one replacement rather than confetti.

use super::result::{DiffOp, DiffOpKind};
use crate::util::{compute_correlation, flatten_correlation, group_adjacent, CorrelationStatus, Hashable};

#[derive(Debug, Clone, Copy)]
struct Token<'a>(&'a str);

impl Hashable for Token<'_> {
    fn hash(&self) -> &str {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenClass {
    Word,
    Space,
    Other,
}

impl TokenClass {
    fn of(c: char) -> Self {
        if c.is_alphanumeric() {
            TokenClass::Word
        } else if c.is_whitespace() {
            TokenClass::Space
        } else {
            TokenClass::Other
        }
    }
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<TokenClass> = None;

    for (offset, c) in text.char_indices() {
        let class = TokenClass::of(c);
        let continues = current == Some(class) && class != TokenClass::Other;
        if !continues {
            if offset > start {
                tokens.push(Token(&text[start..offset]));
            }
            start = offset;
            current = Some(class);
        }
    }
    if start < text.len() {
        tokens.push(Token(&text[start..]));
    }

    tokens
}

fn concat(tokens: &[Token<'_>]) -> String {
    tokens.iter().map(|token| token.0).collect()
}

/// Computes an edit script turning `old` into `new`.
///
/// Every stretch of edits is emitted as at most one `delete` followed by at
/// most one `insert`, and equalities never touch each other.
pub fn diff_text(old: &str, new: &str) -> Vec<DiffOp> {
    let old_tokens = tokenize(old);
    let new_tokens = tokenize(new);
    let correlation = flatten_correlation(compute_correlation(&old_tokens, &new_tokens));

    let mut ops = Vec::with_capacity(correlation.len());
    for sequence in correlation {
        match sequence.status {
            CorrelationStatus::Equal => {
                let tokens = sequence.items2.unwrap_or_default();
                ops.push(DiffOp::equal(concat(&tokens)));
            }
            CorrelationStatus::Deleted => {
                let tokens = sequence.items1.unwrap_or_default();
                ops.push(DiffOp::delete(concat(&tokens)));
            }
            CorrelationStatus::Inserted => {
                let tokens = sequence.items2.unwrap_or_default();
                ops.push(DiffOp::insert(concat(&tokens)));
            }
        }
    }

    cleanup_semantic(ops)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Equal(String),
    Edit { deleted: String, inserted: String },
}

impl Segment {
    /// Length of the larger side of an edit; zero for equalities.
    fn edit_len(&self) -> usize {
        match self {
            Segment::Equal(_) => 0,
            Segment::Edit { deleted, inserted } => deleted.chars().count().max(inserted.chars().count()),
        }
    }
}

fn to_segments(ops: Vec<DiffOp>) -> Vec<Segment> {
    group_adjacent(ops.into_iter(), |op| op.op == DiffOpKind::Equal)
        .into_iter()
        .map(|group| {
            let mut deleted = String::new();
            let mut inserted = String::new();
            let mut equal = String::new();
            let mut is_equal = false;
            for op in group {
                match op.op {
                    DiffOpKind::Equal => {
                        is_equal = true;
                        equal.push_str(&op.text);
                    }
                    DiffOpKind::Delete => deleted.push_str(&op.text),
                    DiffOpKind::Insert => inserted.push_str(&op.text),
                }
            }
            if is_equal {
                Segment::Equal(equal)
            } else {
                Segment::Edit { deleted, inserted }
            }
        })
        .filter(|segment| !matches!(segment, Segment::Equal(text) if text.is_empty()))
        .collect()
}

fn to_ops(segments: Vec<Segment>) -> Vec<DiffOp> {
    let mut result = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            Segment::Equal(text) => result.push(DiffOp::equal(text)),
            Segment::Edit { deleted, inserted } => {
                if !deleted.is_empty() {
                    result.push(DiffOp::delete(deleted));
                }
                if !inserted.is_empty() {
                    result.push(DiffOp::insert(inserted));
                }
            }
        }
    }
    result
}

/// Folds each equality that is no longer than the edits on both of its sides
/// into those edits, until none is left.
pub fn cleanup_semantic(ops: Vec<DiffOp>) -> Vec<DiffOp> {
    let mut segments = to_segments(ops);
    // Equalities before `from` were checked and their neighbours are unchanged.
    let mut from = 1;

    loop {
        let foldable = (from..segments.len().saturating_sub(1)).find(|&i| match &segments[i] {
            Segment::Equal(text) => {
                let len = text.chars().count();
                len <= segments[i - 1].edit_len() && len <= segments[i + 1].edit_len()
            }
            Segment::Edit { .. } => false,
        });
        let Some(i) = foldable else {
            break;
        };

        let merged: Vec<Segment> = segments.drain(i - 1..=i + 1).collect();
        let mut deleted = String::new();
        let mut inserted = String::new();
        for segment in merged {
            match segment {
                Segment::Equal(text) => {
                    deleted.push_str(&text);
                    inserted.push_str(&text);
                }
                Segment::Edit { deleted: d, inserted: n } => {
                    deleted.push_str(&d);
                    inserted.push_str(&n);
                }
            }
        }
        segments.insert(i - 1, Segment::Edit { deleted, inserted });
        // The equality just before the merged edit now borders a longer edit.
        from = i.saturating_sub(2).max(1);
    }

    to_ops(segments)
}

/// Change classification of one diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStatus {
    /// Only insertions.
    pub added: bool,
    /// Only deletions.
    pub removed: bool,
    /// Anything other than equalities.
    pub changed: bool,
}

impl DiffStatus {
    pub fn of(diff: &[DiffOp]) -> Self {
        let has_insert = diff.iter().any(|op| op.op == DiffOpKind::Insert);
        let has_delete = diff.iter().any(|op| op.op == DiffOpKind::Delete);
        Self {
            added: has_insert && !has_delete,
            removed: has_delete && !has_insert,
            changed: has_insert || has_delete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn side(diff: &[DiffOp], skip: DiffOpKind) -> String {
        diff.iter().filter(|op| op.op != skip).map(|op| op.text.as_str()).collect()
    }

    #[test]
    fn tokenize_splits_words_spaces_and_punctuation() {
        let tokens: Vec<_> = tokenize("Net sales,  up 5%.").into_iter().map(|t| t.0).collect();
        assert_eq!(tokens, vec!["Net", " ", "sales", ",", "  ", "up", " ", "5", "%", "."]);
    }

    #[test]
    fn identical_text_is_one_equality() {
        assert_eq!(diff_text("Same text.", "Same text."), vec![DiffOp::equal("Same text.")]);
    }

    #[test]
    fn both_empty_is_empty_diff() {
        assert!(diff_text("", "").is_empty());
    }

    #[test]
    fn one_word_change_is_one_delete_and_one_insert() {
        let diff = diff_text("We sold anvils in 2023.", "We sold hammers in 2023.");
        assert_eq!(
            diff,
            vec![
                DiffOp::equal("We sold "),
                DiffOp::delete("anvils"),
                DiffOp::insert("hammers"),
                DiffOp::equal(" in 2023."),
            ]
        );
    }

    #[test]
    fn against_empty_is_pure_insert_or_delete() {
        assert_eq!(diff_text("", "New risk."), vec![DiffOp::insert("New risk.")]);
        assert_eq!(diff_text("Old risk.", ""), vec![DiffOp::delete("Old risk.")]);
    }

    #[test]
    fn short_equalities_between_edits_are_folded() {
        let diff = diff_text("alpha beta", "gamma delta");
        assert_eq!(diff, vec![DiffOp::delete("alpha beta"), DiffOp::insert("gamma delta")]);
    }

    #[test]
    fn long_equalities_survive_cleanup() {
        let diff = diff_text("a shared phrase b", "c shared phrase d");
        assert_eq!(
            diff,
            vec![
                DiffOp::delete("a"),
                DiffOp::insert("c"),
                DiffOp::equal(" shared phrase "),
                DiffOp::delete("b"),
                DiffOp::insert("d"),
            ]
        );
    }

    #[test]
    fn diff_reproduces_both_sides() {
        let old = "Walmart operates 10,500 stores under 46 banners.";
        let new = "Walmart operates approximately 10,600 stores under 46 banners in 19 countries.";
        let diff = diff_text(old, new);

        assert_eq!(side(&diff, DiffOpKind::Delete), new);
        assert_eq!(side(&diff, DiffOpKind::Insert), old);
    }

    #[test]
    fn status_classification() {
        assert_eq!(
            DiffStatus::of(&[DiffOp::equal("a"), DiffOp::insert("b")]),
            DiffStatus { added: true, removed: false, changed: true }
        );
        assert_eq!(
            DiffStatus::of(&[DiffOp::delete("a")]),
            DiffStatus { added: false, removed: true, changed: true }
        );
        assert_eq!(
            DiffStatus::of(&[DiffOp::delete("a"), DiffOp::insert("b")]),
            DiffStatus { added: false, removed: false, changed: true }
        );
        assert_eq!(DiffStatus::of(&[DiffOp::equal("a")]), DiffStatus::default());
    }

    #[test]
    fn long_block_with_scattered_edits_diffs_quickly() {
        let words = 4000;
        let old: Vec<String> = (0..words).map(|i| format!("word{}", i)).collect();
        let new: Vec<String> = (0..words)
            .map(|i| if i % 10 == 0 { format!("edit{}", i) } else { format!("word{}", i) })
            .collect();
        let (old, new) = (old.join(" "), new.join(" "));

        let started = std::time::Instant::now();
        let diff = diff_text(&old, &new);
        let elapsed = started.elapsed();

        let budget = if cfg!(debug_assertions) { 10 } else { 1 };
        assert!(elapsed.as_secs_f64() < budget as f64, "took {:?}", elapsed);
        assert_eq!(side(&diff, DiffOpKind::Delete), new);
        assert_eq!(side(&diff, DiffOpKind::Insert), old);
        let deletes = diff.iter().filter(|op| op.op == DiffOpKind::Delete).count();
        let inserts = diff.iter().filter(|op| op.op == DiffOpKind::Insert).count();
        assert_eq!((deletes, inserts), (words / 10, words / 10));
    }
}
