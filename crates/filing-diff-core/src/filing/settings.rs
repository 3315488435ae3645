use serde::{Deserialize, Serialize};

/// Settings for turning filing markup into a [`ParsedDocument`](super::ParsedDocument).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Normalized phrase that marks the table of contents.
    pub toc_marker: String,

    /// Fail the parse when a TOC entry links to an anchor no fragment carries.
    /// When false such entries are kept in the TOC but get no section.
    pub strict_anchors: bool,

    /// Exact `style` attribute value of fragments that are never shown.
    pub hidden_style: String,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            toc_marker: "table of contents".to_string(),
            strict_anchors: true,
            hidden_style: "display:none".to_string(),
        }
    }
}

impl ParserSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict_anchors(mut self, strict: bool) -> Self {
        self.strict_anchors = strict;
        self
    }

    pub fn with_toc_marker(mut self, marker: &str) -> Self {
        self.toc_marker = marker.to_string();
        self
    }
}
