#![allow(non_snake_case)]

/// Inline XBRL annotation namespaces (1.1 and the legacy 1.0 draft).
pub mod IX {
    pub const NS: &str = "http://www.xbrl.org/2013/inlineXBRL";
    pub const NS_2008: &str = "http://www.xbrl.org/2008/inlineXBRL";

    pub fn is_inline_namespace(namespace: Option<&str>) -> bool {
        matches!(namespace, Some(NS) | Some(NS_2008))
    }

    /// Attributes copied onto the host element under a `data-ix-` name.
    pub const SHADOWED_ATTRIBUTES: [&str; 3] = ["contextref", "name", "continuedat"];

    pub const SHADOW_PREFIX: &str = "data-ix-";

    /// Shadow attribute carrying the concept name of the unwrapped fact.
    pub const CONCEPT_NAME: &str = "data-ix-name";
}
