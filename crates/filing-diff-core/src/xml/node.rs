use super::xname::{XAttribute, XName};

#[derive(Clone, Debug)]
pub enum XmlNodeData {
    Element {
        name: XName,
        attributes: Vec<XAttribute>,
    },
    Text(String),
    CData(String),
    Comment(String),
}

impl XmlNodeData {
    pub fn element(name: XName) -> Self {
        Self::Element {
            name,
            attributes: Vec::new(),
        }
    }

    pub fn element_with_attrs(name: XName, attributes: Vec<XAttribute>) -> Self {
        Self::Element { name, attributes }
    }

    pub fn text(content: &str) -> Self {
        Self::Text(content.to_string())
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn name(&self) -> Option<&XName> {
        match self {
            Self::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// True for an element whose local name matches `local_name` (ASCII case-insensitive).
    pub fn is_named(&self, local_name: &str) -> bool {
        self.name().is_some_and(|name| name.is(local_name))
    }

    pub fn attributes(&self) -> Option<&[XAttribute]> {
        match self {
            Self::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    pub fn attributes_mut(&mut self) -> Option<&mut Vec<XAttribute>> {
        match self {
            Self::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    /// Attribute value by local name, ignoring namespace and ASCII case.
    pub fn attribute(&self, local_name: &str) -> Option<&str> {
        self.attributes()?
            .iter()
            .find(|attr| attr.name.is(local_name))
            .map(|attr| attr.value.as_str())
    }

    pub fn text_content(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::CData(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_node_creation() {
        let name = XName::local("div");
        let node = XmlNodeData::element(name.clone());
        assert!(node.is_element());
        assert_eq!(node.name(), Some(&name));
        assert!(node.is_named("DIV"));
    }

    #[test]
    fn text_node_creation() {
        let node = XmlNodeData::text("Item 1A. Risk Factors");
        assert!(node.is_text());
        assert!(!node.is_named("div"));
        assert_eq!(node.text_content(), Some("Item 1A. Risk Factors"));
    }

    #[test]
    fn attribute_lookup_ignores_case() {
        let node = XmlNodeData::element_with_attrs(
            XName::local("span"),
            vec![XAttribute::new(XName::local("contextRef"), "c-1")],
        );
        assert_eq!(node.attribute("contextref"), Some("c-1"));
        assert_eq!(node.attribute("name"), None);
    }
}
