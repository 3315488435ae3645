//! Monotonic fragment matching.
//!
//! A matching is an assignment `new index -> old index` that never crosses:
//! if new `a < b` are both matched, their old indices are ordered the same
//! way. Each stage only looks at old fragments between the matched
//! neighbours of the fragment being placed, so later, looser stages can
//! fill gaps without breaking the order established by earlier ones.

use super::settings::MatchStage;
use crate::util::similarity;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FragmentMatch {
    pub old_index: usize,
    pub new_index: usize,
}

/// Runs every stage in order over fresh state and returns the matches sorted
/// by new index (and therefore by old index).
///
/// `old` and `new` are the normalized texts of the fragments; empty texts
/// never match.
pub fn match_fragments(old: &[String], new: &[String], stages: &[MatchStage]) -> Vec<FragmentMatch> {
    let mut assignment = vec![None; new.len()];
    for &stage in stages {
        let matched = apply_stage(old, new, &mut assignment, stage);
        debug!(?stage, matched, "fragment matching stage");
    }

    assignment
        .iter()
        .enumerate()
        .filter_map(|(new_index, old_index)| old_index.map(|old_index| FragmentMatch { old_index, new_index }))
        .collect()
}

/// Extends `assignment` with one stage, returning how many new matches it made.
///
/// `assignment` must already be monotonic; it stays monotonic.
pub fn apply_stage(old: &[String], new: &[String], assignment: &mut [Option<usize>], stage: MatchStage) -> usize {
    let old_lengths: Vec<usize> = old.iter().map(|text| text.chars().count()).collect();

    // Matches made during this pass only ever sit before the fragment being
    // placed, so the upper bounds can be computed once up front.
    let mut upper_bounds = vec![old.len(); new.len()];
    let mut next_anchor = old.len();
    for new_index in (0..new.len()).rev() {
        upper_bounds[new_index] = next_anchor;
        if let Some(old_index) = assignment[new_index] {
            next_anchor = old_index;
        }
    }

    let mut lower = 0;
    let mut matched = 0;
    for (new_index, text) in new.iter().enumerate() {
        if let Some(old_index) = assignment[new_index] {
            lower = old_index + 1;
            continue;
        }
        if text.is_empty() {
            continue;
        }

        let upper = upper_bounds[new_index];
        if lower >= upper {
            continue;
        }

        let candidate = match stage {
            MatchStage::Exact => (lower..upper).find(|&old_index| old[old_index] == *text),
            MatchStage::Similar { threshold } => {
                best_similar(old, &old_lengths, lower..upper, text, threshold)
            }
        };

        if let Some(old_index) = candidate {
            assignment[new_index] = Some(old_index);
            lower = old_index + 1;
            matched += 1;
        }
    }

    matched
}

/// Highest-scoring old fragment strictly above `threshold`; ties keep the earliest.
fn best_similar(
    old: &[String],
    old_lengths: &[usize],
    window: std::ops::Range<usize>,
    text: &str,
    threshold: f64,
) -> Option<usize> {
    let length = text.chars().count();
    let mut best: Option<(usize, f64)> = None;

    for old_index in window {
        let old_length = old_lengths[old_index];
        if old_length == 0 {
            continue;
        }
        // Similarity can never exceed the ratio of the shorter to the longer text.
        let ceiling = old_length.min(length) as f64 / old_length.max(length) as f64;
        if ceiling <= threshold || best.is_some_and(|(_, score)| ceiling <= score) {
            continue;
        }

        let score = similarity(&old[old_index], text);
        if score > threshold && best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((old_index, score));
        }
    }

    best.map(|(old_index, _)| old_index)
}
