use super::settings::ParserSettings;
use super::types::{Fragment, Section, SectionKind, TocEntry};
use crate::error::{FilingDiffError, Result};
use crate::util::{is_ascii_digits, normalize_text, normalized_text};
use crate::xml::{XmlDocument, XmlNodeData};
use tracing::warn;

pub const TOC_SECTION_ID: &str = "toc";
pub const TOC_SECTION_TITLE: &str = "Table of Contents";

/// Slices the fragment stream into one section per resolved TOC entry, preceded
/// by a synthetic table-of-contents section.
///
/// May merge fragments in `doc` when a stray page number split a paragraph.
pub fn assemble_sections(
    doc: &mut XmlDocument,
    fragments: &[Fragment],
    toc: &[TocEntry],
    settings: &ParserSettings,
) -> Result<Vec<Section>> {
    let resolved = resolve_entries(toc, settings.strict_anchors)?;
    let filter = FragmentFilter::new(settings);

    let first_index = resolved.first().map_or(fragments.len(), |(_, index)| *index);
    let toc_fragments = filter.apply(doc, &fragments[..first_index]);
    let mut sections = vec![Section {
        id: TOC_SECTION_ID.to_string(),
        title: TOC_SECTION_TITLE.to_string(),
        page_start: 1,
        page_end: toc_fragments.iter().map(|f| f.page).max().unwrap_or(1),
        fragments: toc_fragments,
        depth: 0,
        kind: SectionKind::General,
    }];

    for (position, &(entry, start)) in resolved.iter().enumerate() {
        let end = resolved.get(position + 1).map_or(fragments.len(), |(_, next)| *next);
        let section_fragments = if start < end {
            filter.apply(doc, &fragments[start..end])
        } else {
            Vec::new()
        };

        let page_start = section_fragments.iter().map(|f| f.page).min().unwrap_or(entry.starting_page);
        let page_end = section_fragments.iter().map(|f| f.page).max().unwrap_or(page_start);

        sections.push(Section {
            id: entry.id.clone(),
            title: entry.title.clone(),
            page_start,
            page_end,
            fragments: section_fragments,
            depth: entry.depth,
            kind: entry.kind,
        });
    }

    backfill_page_ends(&mut sections);
    Ok(sections)
}

fn resolve_entries(toc: &[TocEntry], strict: bool) -> Result<Vec<(&TocEntry, usize)>> {
    let mut resolved = Vec::with_capacity(toc.len());
    for entry in toc {
        match entry.starting_fragment_index {
            Some(index) => resolved.push((entry, index)),
            None if strict => {
                return Err(FilingDiffError::UnresolvedTocEntry {
                    id: entry.id.clone(),
                    title: entry.title.clone(),
                })
            }
            None => warn!(id = %entry.id, title = %entry.title, "TOC entry has no matching anchor, skipping section"),
        }
    }
    Ok(resolved)
}

/// Each section ends where the next section at the same or a shallower depth starts.
fn backfill_page_ends(sections: &mut [Section]) {
    for i in 0..sections.len() {
        let depth = sections[i].depth;
        let next_start = sections[i + 1..]
            .iter()
            .find(|next| next.depth <= depth)
            .map(|next| next.page_start);
        if let Some(page) = next_start {
            sections[i].page_end = page;
        }
    }
}

struct FragmentFilter {
    hidden_style: String,
    toc_marker: String,
}

impl FragmentFilter {
    fn new(settings: &ParserSettings) -> Self {
        Self {
            hidden_style: settings.hidden_style.clone(),
            toc_marker: normalize_text(&settings.toc_marker),
        }
    }

    fn apply(&self, doc: &mut XmlDocument, fragments: &[Fragment]) -> Vec<Fragment> {
        let mut retained: Vec<Fragment> = Vec::new();
        let mut i = 0;

        while i < fragments.len() {
            let fragment = &fragments[i];
            i += 1;

            if doc.attribute(fragment.node, "style") == Some(self.hidden_style.as_str()) {
                continue;
            }
            let Some(text) = normalized_text(doc, fragment.node) else {
                continue;
            };

            if is_ascii_digits(&text) {
                if let Some(next) = self.false_page_break(doc, fragments, i - 1) {
                    if let Some(target) = retained.last().map(|last| last.node) {
                        doc.add_child(target, XmlNodeData::text(" "));
                        doc.append_children_from(fragments[next].node, target);
                        i = next + 1;
                    }
                }
                continue;
            }

            if text == self.toc_marker && doc.find_descendant(fragment.node, |_, data| data.is_named("a")).is_some() {
                continue;
            }

            retained.push(fragment.clone());
        }

        retained
    }

    /// Index of the fragment to merge across a stray page number at `index`,
    /// when the surrounding text reads as one interrupted sentence.
    fn false_page_break(&self, doc: &XmlDocument, fragments: &[Fragment], index: usize) -> Option<usize> {
        let has_text = |fragment: &Fragment| !doc.text_content(fragment.node).trim().is_empty();

        let previous = fragments[..index].iter().rposition(has_text)?;
        let next = index + 1 + fragments[index + 1..].iter().position(has_text)?;

        let previous_text = doc.text_content(fragments[previous].node);
        let next_text = doc.text_content(fragments[next].node);
        let ends_sentence = previous_text.trim().ends_with('.');
        let starts_sentence = next_text.trim().starts_with(|c: char| c.is_ascii_uppercase());

        (!ends_sentence && !starts_sentence).then_some(next)
    }
}
