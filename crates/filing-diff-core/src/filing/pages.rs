//! Page boundary reconstruction.
//!
//! Filings print page numbers as small centered paragraphs between content.
//! Only numbers that continue the running sequence are accepted, which keeps
//! centered figures in tables from being read as page numbers.

use super::types::PageBreak;
use crate::util::{normalized_text, strip_whitespace};
use crate::xml::XmlDocument;
use indextree::NodeId;

pub fn build_page_index(doc: &XmlDocument, children: &[NodeId]) -> Vec<PageBreak> {
    let mut breaks: Vec<PageBreak> = Vec::new();
    let mut previous_index = 0;
    let mut last_anchor = String::new();

    for (index, &child) in children.iter().enumerate() {
        let preceding_anchor_id = last_anchor.clone();
        if let Some(id) = doc.attribute(child, "id").filter(|id| !id.is_empty()) {
            last_anchor = id.to_string();
        }

        if !has_centered_marker(doc, child) {
            continue;
        }
        let Some(page) = normalized_text(doc, child).as_deref().and_then(leading_number) else {
            continue;
        };

        let continues_run = match breaks.last() {
            None => true,
            Some(previous) => previous.page.checked_add(1) == Some(page),
        };
        if !continues_run {
            continue;
        }

        breaks.push(PageBreak {
            start_index: previous_index,
            page,
            preceding_anchor_id,
        });
        previous_index = index;
    }

    breaks
}

/// The first `div` nested two `div`s deep must be centered.
fn has_centered_marker(doc: &XmlDocument, child: NodeId) -> bool {
    let marker = doc.find_descendant(child, |id, data| {
        data.is_named("div")
            && doc.parent(id).is_some_and(|parent| {
                doc.is_named(parent, "div")
                    && doc.parent(parent).is_some_and(|grandparent| doc.is_named(grandparent, "div"))
            })
    });

    marker
        .and_then(|id| doc.attribute(id, "style"))
        .is_some_and(|style| strip_whitespace(style).contains("text-align:center"))
}

/// Parses the leading digits of `text` as a page number; page 0 is never valid.
fn leading_number(text: &str) -> Option<u32> {
    let digits = text.len() - text.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    text[..digits].parse::<u32>().ok().filter(|&page| page > 0)
}

/// Page and anchor of the fragment at `index`: the latest break starting at or before it.
pub fn page_at(breaks: &[PageBreak], index: usize) -> (u32, &str) {
    let count = breaks.partition_point(|page_break| page_break.start_index <= index);
    match count.checked_sub(1).and_then(|last| breaks.get(last)) {
        Some(page_break) => (page_break.page, page_break.preceding_anchor_id.as_str()),
        None => (1, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse;

    fn page_marker(number: &str) -> String {
        format!(r#"<div><div><div style="text-align: center"><span>{}</span></div></div></div>"#, number)
    }

    fn body_children(body: &str) -> (XmlDocument, Vec<NodeId>) {
        let doc = parse(&format!("<body>{}</body>", body)).unwrap();
        let root = doc.root().unwrap();
        let children = doc.element_children(root).collect();
        (doc, children)
    }

    #[test]
    fn accepts_consecutive_page_numbers() {
        let body = format!(
            r#"<div id="a1">Intro</div>{}<div id="a2">Business</div>{}<div>More</div>"#,
            page_marker("1"),
            page_marker("2")
        );
        let (doc, children) = body_children(&body);
        let breaks = build_page_index(&doc, &children);

        assert_eq!(
            breaks,
            vec![
                PageBreak { start_index: 0, page: 1, preceding_anchor_id: "a1".to_string() },
                PageBreak { start_index: 1, page: 2, preceding_anchor_id: "a2".to_string() },
            ]
        );
    }

    #[test]
    fn rejects_numbers_that_break_the_run() {
        let body = format!(
            "<div>Intro</div>{}{}{}<div>Body</div>",
            page_marker("1"),
            page_marker("648125"),
            page_marker("2")
        );
        let (doc, children) = body_children(&body);
        let pages: Vec<_> = build_page_index(&doc, &children).iter().map(|b| b.page).collect();

        assert_eq!(pages, vec![1, 2]);
    }

    #[test]
    fn ignores_uncentered_and_non_numeric_candidates() {
        let body = format!(
            r#"<div><div><div style="text-align:left">3</div></div></div>{}<div>Body</div>"#,
            page_marker("Part I")
        );
        let (doc, children) = body_children(&body);
        assert!(build_page_index(&doc, &children).is_empty());
    }

    #[test]
    fn first_accepted_page_can_be_any_number() {
        let body = format!("<div>Cover</div>{}<div>Body</div>{}", page_marker("37"), page_marker("38"));
        let (doc, children) = body_children(&body);
        let pages: Vec<_> = build_page_index(&doc, &children).iter().map(|b| b.page).collect();
        assert_eq!(pages, vec![37, 38]);
    }

    #[test]
    fn page_number_is_read_from_leading_digits() {
        assert_eq!(leading_number("12"), Some(12));
        assert_eq!(leading_number("14 table of contents"), Some(14));
        assert_eq!(leading_number("f 3"), None);
        assert_eq!(leading_number("0"), None);
    }

    #[test]
    fn page_lookup_uses_latest_preceding_break() {
        let breaks = vec![
            PageBreak { start_index: 0, page: 1, preceding_anchor_id: String::new() },
            PageBreak { start_index: 4, page: 2, preceding_anchor_id: "p2".to_string() },
            PageBreak { start_index: 9, page: 3, preceding_anchor_id: "p3".to_string() },
        ];
        assert_eq!(page_at(&breaks, 0), (1, ""));
        assert_eq!(page_at(&breaks, 4), (2, "p2"));
        assert_eq!(page_at(&breaks, 8), (2, "p2"));
        assert_eq!(page_at(&breaks, 20), (3, "p3"));
        assert_eq!(page_at(&[], 5), (1, ""));
    }
}
