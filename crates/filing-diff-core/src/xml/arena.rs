use super::node::XmlNodeData;
use super::xname::{XAttribute, XName};
use indextree::{Arena, NodeId};

/// Owned, mutable markup tree.
///
/// Nodes live in an `indextree` arena and are addressed by `NodeId`, so a
/// parse can splice children between parents without shared ownership.
pub struct XmlDocument {
    arena: Arena<XmlNodeData>,
    root: Option<NodeId>,
}

impl XmlDocument {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&XmlNodeData> {
        self.arena.get(id).map(|node| node.get())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut XmlNodeData> {
        self.arena.get_mut(id).map(|node| node.get_mut())
    }

    pub fn add_root(&mut self, data: XmlNodeData) -> NodeId {
        let id = self.arena.new_node(data);
        self.root = Some(id);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, data: XmlNodeData) -> NodeId {
        let child = self.arena.new_node(data);
        parent.append(child, &mut self.arena);
        child
    }

    pub fn remove(&mut self, node: NodeId) {
        node.remove(&mut self.arena);
    }

    /// Sets an attribute by local name, overwriting any existing value
    /// regardless of its case or namespace.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(node_data) = self.get_mut(node) {
            if let Some(attrs) = node_data.attributes_mut() {
                if let Some(attr) = attrs.iter_mut().find(|a| a.name.is(name)) {
                    attr.value = value.to_string();
                } else {
                    attrs.push(XAttribute::new(XName::local(name), value));
                }
            }
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node)?.attribute(name)
    }

    pub fn is_named(&self, node: NodeId, local_name: &str) -> bool {
        self.get(node).is_some_and(|data| data.is_named(local_name))
    }

    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        parent.children(&self.arena)
    }

    pub fn element_children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(parent)
            .filter(move |&child| self.get(child).is_some_and(XmlNodeData::is_element))
    }

    /// Descendants in document order, starting with `node` itself.
    pub fn descendants(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.descendants(&self.arena)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?.parent()
    }

    /// First proper descendant (document order) satisfying `predicate`.
    pub fn find_descendant<F>(&self, node: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(NodeId, &XmlNodeData) -> bool,
    {
        self.descendants(node)
            .skip(1)
            .find(|&id| self.get(id).is_some_and(|data| predicate(id, data)))
    }

    /// Concatenated text of every descendant text node, like DOM `textContent`.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut text = String::new();
        for id in self.descendants(node) {
            if let Some(content) = self.get(id).and_then(XmlNodeData::text_content) {
                text.push_str(content);
            }
        }
        text
    }

    /// Moves every child of `from`, in order, to sit immediately before `anchor`.
    pub fn move_children_before(&mut self, from: NodeId, anchor: NodeId) {
        let children: Vec<_> = self.children(from).collect();
        for child in children {
            child.detach(&mut self.arena);
            anchor.insert_before(child, &mut self.arena);
        }
    }

    /// Moves every child of `from`, in order, to the end of `to`.
    pub fn append_children_from(&mut self, from: NodeId, to: NodeId) {
        let children: Vec<_> = self.children(from).collect();
        for child in children {
            child.detach(&mut self.arena);
            to.append(child, &mut self.arena);
        }
    }
}

impl Default for XmlDocument {
    fn default() -> Self {
        Self::new()
    }
}
