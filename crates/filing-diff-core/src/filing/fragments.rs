use super::pages::page_at;
use super::types::{Fragment, FragmentKind, PageBreak};
use crate::util::{collapse_whitespace, strip_whitespace};
use crate::xml::XmlDocument;
use indextree::NodeId;
use once_cell::sync::Lazy;
use regex::Regex;

static FOOTNOTE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(\d+\)$").unwrap());

const BOLD_STYLES: [&str; 2] = ["font-weight:bold", "font-weight:700"];

/// Builds one [`Fragment`] per top-level child, in document order.
pub fn classify_fragments(doc: &XmlDocument, children: &[NodeId], breaks: &[PageBreak]) -> Vec<Fragment> {
    children
        .iter()
        .enumerate()
        .map(|(index, &node)| {
            let (page, anchor) = page_at(breaks, index);
            let (kind, title) = classify(doc, node);
            Fragment {
                node,
                kind,
                page,
                preceding_anchor_id: anchor.to_string(),
                title,
            }
        })
        .collect()
}

fn classify(doc: &XmlDocument, node: NodeId) -> (FragmentKind, Option<String>) {
    let mut kind = FragmentKind::General;

    let first_span = doc.find_descendant(node, |_, data| data.is_named("span"));
    if first_span.is_some_and(|span| FOOTNOTE_MARKER.is_match(&doc.text_content(span))) {
        kind = FragmentKind::Footnote;
    }

    if contains_table(doc, node) {
        kind = FragmentKind::Table;
    }

    if let Some(bold) = doc.find_descendant(node, |_, data| data.is_named("span") && is_bold(data.attribute("style"))) {
        if !doc.text_content(node).contains('\n') {
            return (FragmentKind::SubsectionTitle, Some(collapse_whitespace(&doc.text_content(bold))));
        }
    }

    (kind, None)
}

fn contains_table(doc: &XmlDocument, node: NodeId) -> bool {
    doc.descendants(node).any(|id| doc.is_named(id, "table"))
}

fn is_bold(style: Option<&str>) -> bool {
    style.is_some_and(|style| {
        let style = strip_whitespace(style).to_ascii_lowercase();
        BOLD_STYLES.iter().any(|bold| style.contains(bold))
    })
}
