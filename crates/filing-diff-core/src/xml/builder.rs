use super::arena::XmlDocument;
use super::node::XmlNodeData;
use crate::error::{FilingDiffError, Result};
use indextree::NodeId;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

/// Elements written as `<tag/>`; everything else always gets an end tag so
/// HTML consumers do not read an empty `<div/>` as an open element.
const VOID_ELEMENTS: [&str; 8] = ["br", "hr", "img", "col", "input", "meta", "link", "wbr"];

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlOptions {
    /// Drop `href` attributes that point inside the document (`#anchor`).
    pub strip_internal_links: bool,
}

impl HtmlOptions {
    pub fn for_diff() -> Self {
        Self {
            strip_internal_links: true,
        }
    }
}

/// Serializes the outer markup of `node` as HTML: local names only, no
/// namespace declarations, comments omitted.
pub fn serialize_html(doc: &XmlDocument, node: NodeId, options: HtmlOptions) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    write_node(doc, node, &mut writer, options)?;
    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| FilingDiffError::XmlWrite(e.to_string()))
}

fn write_node<W: std::io::Write>(
    doc: &XmlDocument,
    node: NodeId,
    writer: &mut Writer<W>,
    options: HtmlOptions,
) -> Result<()> {
    let Some(node_data) = doc.get(node) else {
        return Ok(());
    };

    match node_data {
        XmlNodeData::Element { name, attributes } => {
            let tag_name = name.local_name.as_str();
            let mut elem = BytesStart::new(tag_name);
            for attr in attributes {
                if options.strip_internal_links && attr.name.is("href") && attr.value.starts_with('#') {
                    continue;
                }
                elem.push_attribute((attr.name.local_name.as_str(), attr.value.as_str()));
            }

            if VOID_ELEMENTS.iter().any(|void| name.is(void)) {
                writer
                    .write_event(Event::Empty(elem))
                    .map_err(|e| FilingDiffError::XmlWrite(e.to_string()))?;
                return Ok(());
            }

            writer
                .write_event(Event::Start(elem))
                .map_err(|e| FilingDiffError::XmlWrite(e.to_string()))?;
            for child in doc.children(node) {
                write_node(doc, child, writer, options)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(tag_name)))
                .map_err(|e| FilingDiffError::XmlWrite(e.to_string()))?;
        }
        XmlNodeData::Text(text) | XmlNodeData::CData(text) => {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|e| FilingDiffError::XmlWrite(e.to_string()))?;
        }
        XmlNodeData::Comment(_) => {}
    }

    Ok(())
}
