use super::fragments::classify_fragments;
use super::normalize::unwrap_inline_tags;
use super::pages::build_page_index;
use super::sections::assemble_sections;
use super::settings::ParserSettings;
use super::toc::extract_table_of_contents;
use super::types::ParsedDocument;
use crate::error::{FilingDiffError, Result};
use crate::xml::{parse, XmlDocument};
use indextree::NodeId;
use tracing::{debug, info};

/// Turns 10-K / 10-Q inline XBRL markup into a sectioned [`ParsedDocument`].
///
/// The pipeline runs in a fixed order:
/// 1. unwrap inline XBRL annotations into their host elements
/// 2. detect page numbers among the body's top-level elements
/// 3. classify each top-level element as a fragment
/// 4. extract the table of contents and expand the financial statement notes
/// 5. slice fragments into sections and compute page ranges
pub struct FilingParser;

impl FilingParser {
    pub fn parse(markup: &str, settings: Option<&ParserSettings>) -> Result<ParsedDocument> {
        let settings = settings.cloned().unwrap_or_default();

        let mut document = parse(markup)?;
        let body = find_body(&document).ok_or(FilingDiffError::MissingBody)?;

        let unwrapped = unwrap_inline_tags(&mut document, body);
        let children: Vec<NodeId> = document.element_children(body).collect();
        debug!(unwrapped, children = children.len(), "normalized document body");

        let breaks = build_page_index(&document, &children);
        debug!(page_breaks = breaks.len(), "built page index");

        let fragments = classify_fragments(&document, &children, &breaks);
        let table_of_contents = extract_table_of_contents(&document, &fragments, &settings.toc_marker)?;
        let sections = assemble_sections(&mut document, &fragments, &table_of_contents, &settings)?;

        info!(
            fragments = fragments.len(),
            toc_entries = table_of_contents.len(),
            sections = sections.len(),
            "parsed filing"
        );

        Ok(ParsedDocument {
            document,
            sections,
            table_of_contents,
        })
    }
}

/// Parses a filing with default settings.
pub fn parse_filing(markup: &str) -> Result<ParsedDocument> {
    FilingParser::parse(markup, None)
}

fn find_body(document: &XmlDocument) -> Option<NodeId> {
    let root = document.root()?;
    document.descendants(root).find(|&node| document.is_named(node, "body"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filing::types::{FragmentKind, SectionKind};
    use pretty_assertions::assert_eq;

    const FILING: &str = r##"<html xmlns="http://www.w3.org/1999/xhtml" xmlns:ix="http://www.xbrl.org/2013/inlineXBRL">
<body>
<div style="display:none"><ix:header>hidden facts</ix:header></div>
<div><span>ACME CORP ANNUAL REPORT</span></div>
<div><span>TABLE OF CONTENTS</span></div>
<table>
<tr><td><a href="#i1">Item 1. Business</a></td><td><a href="#i1">1</a></td></tr>
<tr><td><a href="#i1a">Item 1A. Risk Factors</a></td><td><a href="#i1a">2</a></td></tr>
</table>
<div id="i1"><span style="font-weight:bold">Item 1. Business</span></div>
<div><span>We make <ix:nonNumeric name="dei:Product" contextRef="c1">anvils</ix:nonNumeric>.</span></div>
<div><div><div style="text-align:center"><span>1</span></div></div></div>
<div id="i1a"><span style="font-weight:bold">Item 1A. Risk Factors</span></div>
<div><span>Demand for anvils may fall.</span></div>
<div><div><div style="text-align:center"><span>2</span></div></div></div>
</body>
</html>"##;

    #[test]
    fn parses_sections_from_table_of_contents() {
        let parsed = parse_filing(FILING).unwrap();
        let outline: Vec<_> = parsed
            .sections()
            .iter()
            .map(|s| (s.id.as_str(), s.title.as_str(), s.page_start, s.page_end, s.fragments.len(), s.kind))
            .collect();

        assert_eq!(
            outline,
            vec![
                ("toc", "Table of Contents", 1, 1, 3, SectionKind::General),
                ("i1", "Item 1. Business", 1, 2, 2, SectionKind::General),
                ("i1a", "Item 1A. Risk Factors", 2, 2, 2, SectionKind::RiskFactors),
            ]
        );
    }

    #[test]
    fn inline_annotations_are_unwrapped_onto_host() {
        let parsed = parse_filing(FILING).unwrap();
        let fragment = &parsed.sections()[1].fragments[1];
        let doc = parsed.document();

        assert_eq!(parsed.fragment_text(fragment), "We make anvils.");
        let span = doc.find_descendant(fragment.node, |_, data| data.is_named("span")).unwrap();
        assert_eq!(doc.attribute(span, "data-ix-name"), Some("dei:Product"));
        assert_eq!(doc.attribute(span, "data-ix-contextref"), Some("c1"));
    }

    #[test]
    fn headings_become_subsection_titles() {
        let parsed = parse_filing(FILING).unwrap();
        let heading = &parsed.sections()[2].fragments[0];
        assert_eq!(heading.kind, FragmentKind::SubsectionTitle);
        assert_eq!(heading.title.as_deref(), Some("Item 1A. Risk Factors"));
    }

    #[test]
    fn missing_body_is_an_error() {
        let err = parse_filing("<html><head/></html>").unwrap_err();
        assert!(matches!(err, FilingDiffError::MissingBody));
    }

    #[test]
    fn malformed_markup_is_an_error() {
        let err = parse_filing("<html><body><div></body></html>").unwrap_err();
        assert!(matches!(err, FilingDiffError::XmlParse { .. }));
    }
}
