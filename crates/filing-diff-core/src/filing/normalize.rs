//! Inline XBRL unwrapping.
//!
//! Fact annotations (`ix:nonNumeric`, `ix:nonFraction`, `ix:continuation`, ...)
//! wrap ordinary prose. Each one is replaced by its children, and a few of its
//! attributes move onto the parent element so later stages can still see which
//! concept a paragraph reports.

use crate::xml::namespaces::IX;
use crate::xml::{XmlDocument, XmlNodeData};
use indextree::NodeId;

/// Unwraps every inline annotation below `root`, children before parents.
///
/// Returns the number of elements removed. `root` itself is never unwrapped.
pub fn unwrap_inline_tags(doc: &mut XmlDocument, root: NodeId) -> usize {
    let mut unwrapped = 0;
    for node in post_order(doc, root) {
        if node != root && is_inline_annotation(doc, node) && unwrap(doc, node) {
            unwrapped += 1;
        }
    }
    unwrapped
}

fn post_order(doc: &XmlDocument, root: NodeId) -> Vec<NodeId> {
    let mut order = Vec::new();
    let mut stack = vec![(root, false)];

    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            order.push(node);
            continue;
        }
        stack.push((node, true));
        let children: Vec<_> = doc.element_children(node).collect();
        for child in children.into_iter().rev() {
            stack.push((child, false));
        }
    }

    order
}

fn is_inline_annotation(doc: &XmlDocument, node: NodeId) -> bool {
    doc.get(node)
        .and_then(XmlNodeData::name)
        .is_some_and(|name| IX::is_inline_namespace(name.namespace.as_deref()))
}

fn unwrap(doc: &mut XmlDocument, node: NodeId) -> bool {
    let Some(parent) = doc.parent(node) else {
        return false;
    };
    if !doc.get(parent).is_some_and(XmlNodeData::is_element) {
        return false;
    }

    let attributes = doc
        .get(node)
        .and_then(XmlNodeData::attributes)
        .map(|attrs| attrs.to_vec())
        .unwrap_or_default();

    for attr in attributes {
        let local = attr.name.local_name.to_ascii_lowercase();
        if local == "id" {
            doc.set_attribute(parent, "id", &attr.value);
        } else if IX::SHADOWED_ATTRIBUTES.contains(&local.as_str()) {
            doc.set_attribute(parent, &format!("{}{}", IX::SHADOW_PREFIX, local), &attr.value);
        }
    }

    doc.move_children_before(node, node);
    doc.remove(node);
    true
}
