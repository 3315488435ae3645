use crate::compare::SerializedFragment;
use crate::error::Result;
use crate::util::to_markdown;
use crate::xml::{serialize_html, HtmlOptions, XmlDocument};
use indextree::NodeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FragmentKind {
    General,
    Footnote,
    Table,
    SubsectionTitle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    General,
    AccountingPolicies,
    RiskFactors,
}

/// A detected page boundary: fragments from `start_index` on belong to `page`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBreak {
    pub start_index: usize,
    pub page: u32,
    /// Id of the nearest top-level element before the page marker that carries one.
    pub preceding_anchor_id: String,
}

/// One top-level element of the normalized document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Element in the owning [`ParsedDocument`]'s tree.
    pub node: NodeId,
    pub kind: FragmentKind,
    pub page: u32,
    pub preceding_anchor_id: String,
    /// Bold heading text, set for [`FragmentKind::SubsectionTitle`] only.
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry {
    pub id: String,
    pub title: String,
    pub starting_page: u32,
    pub depth: u32,
    /// Index of the fragment whose `id` equals [`TocEntry::id`], if any.
    pub starting_fragment_index: Option<usize>,
    pub kind: SectionKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub page_start: u32,
    pub page_end: u32,
    pub fragments: Vec<Fragment>,
    pub depth: u32,
    pub kind: SectionKind,
}

/// Result of parsing one filing.
///
/// Owns the normalized markup tree that every [`Fragment::node`] points into.
pub struct ParsedDocument {
    pub(crate) document: XmlDocument,
    pub(crate) sections: Vec<Section>,
    pub(crate) table_of_contents: Vec<TocEntry>,
}

impl ParsedDocument {
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn table_of_contents(&self) -> &[TocEntry] {
        &self.table_of_contents
    }

    pub fn document(&self) -> &XmlDocument {
        &self.document
    }

    /// Raw text content of a fragment's element.
    pub fn fragment_text(&self, fragment: &Fragment) -> String {
        self.document.text_content(fragment.node)
    }

    /// Snapshot of a fragment's markup and Markdown rendering.
    pub fn serialize_fragment(&self, fragment: &Fragment) -> Result<SerializedFragment> {
        let html = serialize_html(&self.document, fragment.node, HtmlOptions::default())?;
        let markdown = to_markdown(&html);
        Ok(SerializedFragment {
            kind: fragment.kind,
            html,
            markdown,
            page: fragment.page,
            preceding_anchor_id: fragment.preceding_anchor_id.clone(),
        })
    }

    pub fn fragment_count(&self) -> usize {
        self.sections.iter().map(|section| section.fragments.len()).sum()
    }

    pub fn outline(&self) -> DocumentOutline {
        DocumentOutline {
            table_of_contents: self.table_of_contents.clone(),
            sections: self
                .sections
                .iter()
                .map(|section| SectionOutline {
                    id: section.id.clone(),
                    title: section.title.clone(),
                    page_start: section.page_start,
                    page_end: section.page_end,
                    depth: section.depth,
                    kind: section.kind,
                    fragment_count: section.fragments.len(),
                })
                .collect(),
        }
    }
}

impl std::fmt::Debug for ParsedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedDocument")
            .field("sections", &self.sections)
            .field("table_of_contents", &self.table_of_contents)
            .finish_non_exhaustive()
    }
}

/// Serializable summary of a [`ParsedDocument`] without fragment content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOutline {
    pub table_of_contents: Vec<TocEntry>,
    pub sections: Vec<SectionOutline>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionOutline {
    pub id: String,
    pub title: String,
    pub page_start: u32,
    pub page_end: u32,
    pub depth: u32,
    pub kind: SectionKind,
    pub fragment_count: usize,
}
