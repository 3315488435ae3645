//! Table-of-contents extraction.
//!
//! The TOC is the first table after a "table of contents" marker. Each
//! linked row gives one entry; the "Notes to Financial Statements" entry is
//! then expanded into one sub-entry per numbered note.

use super::types::{Fragment, FragmentKind, SectionKind, TocEntry};
use crate::error::{FilingDiffError, Result};
use crate::util::{collapse_whitespace, is_ascii_digits, normalize_text, normalized_text};
use crate::xml::namespaces::IX;
use crate::xml::XmlDocument;
use indextree::NodeId;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

static NOTES_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(Notes|Footnotes)\s*(to|for|-)?\s*(the\s*)?(Audited\s*)?((Consolidated|Combined)\s*)?Financial\s+Statements$",
    )
    .unwrap()
});

static NOTE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(Note)?(s)?\s*(\d+)\s*[-.–—]\s*").unwrap());

const NOTE_ID_PREFIX: &str = "consolidated-financial-statement-note-";

/// Extracts TOC entries sorted by starting page, with note sub-entries spliced in.
///
/// `marker` is compared against normalized fragment text, so it is itself
/// normalized first.
pub fn extract_table_of_contents(doc: &XmlDocument, fragments: &[Fragment], marker: &str) -> Result<Vec<TocEntry>> {
    let marker = normalize_text(marker);
    let anchors = anchor_index(doc, fragments);

    let mut entries = Vec::new();
    let mut marker_seen = false;
    let mut table_seen = false;
    let mut within_toc = false;
    let mut depth = 0;

    for fragment in fragments {
        if !within_toc {
            let text = normalized_text(doc, fragment.node).unwrap_or_default();
            if text.contains(&marker) {
                marker_seen = true;
                within_toc = true;
            }
            continue;
        }

        if fragment.kind == FragmentKind::Table {
            entries.extend(parse_toc_table(doc, fragment.node, depth, &anchors));
            table_seen = true;
            within_toc = false;
            depth = 1;
        }
    }

    if !marker_seen {
        return Err(FilingDiffError::MissingTableOfContents { marker });
    }
    if !table_seen {
        return Err(FilingDiffError::MissingTocTable);
    }
    if entries.is_empty() {
        return Err(FilingDiffError::EmptyTableOfContents);
    }

    entries.sort_by_key(|entry| entry.starting_page);
    expand_financial_statement_notes(doc, fragments, &mut entries);

    debug!(entries = entries.len(), "extracted table of contents");
    Ok(entries)
}

/// Fragment index of each element id, first occurrence winning.
fn anchor_index<'a>(doc: &'a XmlDocument, fragments: &[Fragment]) -> HashMap<&'a str, usize> {
    let mut anchors = HashMap::new();
    for (index, fragment) in fragments.iter().enumerate() {
        if let Some(id) = doc.attribute(fragment.node, "id") {
            anchors.entry(id).or_insert(index);
        }
    }
    anchors
}

fn parse_toc_table(doc: &XmlDocument, table: NodeId, depth: u32, anchors: &HashMap<&str, usize>) -> Vec<TocEntry> {
    doc.descendants(table)
        .filter(|&row| doc.is_named(row, "tr"))
        .filter_map(|row| parse_toc_row(doc, row, depth, anchors))
        .collect()
}

fn parse_toc_row(doc: &XmlDocument, row: NodeId, depth: u32, anchors: &HashMap<&str, usize>) -> Option<TocEntry> {
    let mut id = String::new();
    let mut title_parts: Vec<String> = Vec::new();
    let mut page = None;

    let links = doc
        .descendants(row)
        .filter(|&node| doc.is_named(node, "a"))
        .filter_map(|node| doc.attribute(node, "href").map(|href| (node, href)));

    for (link, href) in links {
        if id.is_empty() {
            id = fragment_identifier(href).to_string();
        }

        let text = collapse_whitespace(&doc.text_content(link));
        if is_ascii_digits(&text) {
            page = text.parse::<u32>().ok();
        } else if !text.is_empty() {
            title_parts.push(text);
        }
    }

    let title = title_parts.join(" ");
    let starting_page = page?;
    if id.is_empty() || title.is_empty() {
        return None;
    }

    let kind = if normalize_text(&title).contains("risk factors") {
        SectionKind::RiskFactors
    } else {
        SectionKind::General
    };

    Some(TocEntry {
        starting_fragment_index: anchors.get(id.as_str()).copied(),
        id,
        title,
        starting_page,
        depth,
        kind,
    })
}

/// The part of a link target after `#`, empty when there is none.
fn fragment_identifier(href: &str) -> &str {
    href.split_once('#').map_or("", |(_, fragment)| fragment)
}

fn expand_financial_statement_notes(doc: &XmlDocument, fragments: &[Fragment], entries: &mut Vec<TocEntry>) {
    let Some(position) = entries.iter().position(|entry| NOTES_TITLE.is_match(&entry.title)) else {
        return;
    };
    let parent = &entries[position];
    let Some(start) = parent.starting_fragment_index else {
        return;
    };

    let end = match entries.get(position + 1).and_then(|next| next.starting_fragment_index) {
        Some(index) if index > 0 => index,
        _ => fragments.len(),
    };

    let mut notes = Vec::new();
    for (index, fragment) in fragments.iter().enumerate().take(end).skip(start) {
        if !matches!(fragment.kind, FragmentKind::General | FragmentKind::SubsectionTitle) {
            continue;
        }
        if !carries_concept_name(doc, fragment.node) {
            continue;
        }

        let text = doc.text_content(fragment.node);
        let text = text.trim();
        let Some(captures) = NOTE_HEADING.captures(text) else {
            continue;
        };
        let Some(number) = captures.get(3).and_then(|m| m.as_str().parse::<u32>().ok()) else {
            continue;
        };

        let note_title = collapse_whitespace(&NOTE_HEADING.replace(text, ""));
        let kind = if normalize_text(&note_title).contains("accounting policies") {
            SectionKind::AccountingPolicies
        } else {
            SectionKind::General
        };

        notes.push(TocEntry {
            id: format!("{}{}", NOTE_ID_PREFIX, number),
            title: format!("Note {} - {}", number, note_title),
            starting_page: parent.starting_page,
            depth: parent.depth + 1,
            starting_fragment_index: Some(index),
            kind,
        });
    }

    debug!(notes = notes.len(), parent = %parent.title, "expanded financial statement notes");
    let following = entries.split_off(position + 1);
    entries.extend(notes);
    entries.extend(following);
}

fn carries_concept_name(doc: &XmlDocument, node: NodeId) -> bool {
    doc.descendants(node).any(|id| doc.attribute(id, IX::CONCEPT_NAME).is_some())
}
