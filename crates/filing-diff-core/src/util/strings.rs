use crate::xml::XmlDocument;
use indextree::NodeId;

/// Reduces text to lowercase ASCII letters, digits and single spaces.
///
/// All other characters are removed outright, so `"Item 1A."` and
/// `"ITEM 1A"` normalize to the same `"item 1a"`.
pub fn normalize_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            pending_space = true;
        } else if c.is_ascii_alphanumeric() {
            if pending_space && !result.is_empty() {
                result.push(' ');
            }
            pending_space = false;
            result.push(c.to_ascii_lowercase());
        }
    }

    result
}

/// Normalized text content of a node, `None` when nothing survives normalization.
pub fn normalized_text(doc: &XmlDocument, node: NodeId) -> Option<String> {
    let text = normalize_text(&doc.text_content(node));
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Collapses whitespace runs (including non-breaking spaces) to one space and trims.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes every whitespace character; used to compare inline style declarations.
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn is_ascii_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}
