use super::diff::{diff_text, DiffStatus};
use super::matching::match_fragments;
use super::result::{AlignedRun, ComparedDocument, ComparedSection, DiffOp, SectionStatus, SerializedFragment};
use super::settings::ComparerSettings;
use crate::error::Result;
use crate::filing::{Fragment, FragmentKind, ParsedDocument, Section};
use crate::hash::content_hash_label;
use crate::util::{normalize_bullets, normalized_text, to_markdown};
use crate::xml::{serialize_html, HtmlOptions};
use tracing::{debug, info};

/// Section- and fragment-level comparison of two parsed filings.
///
/// Sections are aligned greedily by title without reordering. Within a
/// matched section fragments are aligned by [`match_fragments`], and every
/// fragment on either side ends up in exactly one [`AlignedRun`].
pub struct FilingComparer;

impl FilingComparer {
    pub fn compare(
        new: &ParsedDocument,
        old: &ParsedDocument,
        settings: Option<&ComparerSettings>,
    ) -> Result<ComparedDocument> {
        let settings = settings.cloned().unwrap_or_default();
        let old_sections = old.sections();

        let mut sections = Vec::with_capacity(new.sections().len().max(old_sections.len()));
        // First old section not yet consumed by a match or a deletion.
        let mut old_cursor = 0;

        for new_section in new.sections() {
            let found = old_sections[old_cursor..]
                .iter()
                .position(|old_section| old_section.title == new_section.title)
                .map(|offset| old_cursor + offset);

            let Some(old_index) = found else {
                let fragments = prepare_section(new, new_section, &settings)?;
                sections.push(one_sided_section(new_section, fragments, SectionStatus::Inserted, &settings));
                continue;
            };

            for skipped in &old_sections[old_cursor..old_index] {
                let fragments = prepare_section(old, skipped, &settings)?;
                sections.push(one_sided_section(skipped, fragments, SectionStatus::Deleted, &settings));
            }

            let old_fragments = prepare_section(old, &old_sections[old_index], &settings)?;
            let new_fragments = prepare_section(new, new_section, &settings)?;
            let runs = align_runs(&old_fragments, &new_fragments, &settings);
            sections.push(compared_section(new_section, runs, SectionStatus::Matched));
            old_cursor = old_index + 1;
        }

        for remaining in &old_sections[old_cursor..] {
            let fragments = prepare_section(old, remaining, &settings)?;
            sections.push(one_sided_section(remaining, fragments, SectionStatus::Deleted, &settings));
        }

        let document = ComparedDocument { sections };
        let stats = document.statistics();
        info!(
            sections = document.sections.len(),
            matched = stats.sections_matched,
            inserted = stats.sections_inserted,
            deleted = stats.sections_deleted,
            changed_runs = stats.runs_added + stats.runs_removed + stats.runs_changed,
            "comparison complete"
        );
        Ok(document)
    }
}

/// Compares two parsed filings with default settings.
pub fn compare_documents(new: &ParsedDocument, old: &ParsedDocument) -> Result<ComparedDocument> {
    FilingComparer::compare(new, old, None)
}

/// A fragment rendered once for output, diffing and matching.
#[derive(Debug, Clone)]
struct PreparedFragment {
    serialized: SerializedFragment,
    diff_text: String,
    match_text: String,
}

fn prepare_section(
    document: &ParsedDocument,
    section: &Section,
    settings: &ComparerSettings,
) -> Result<Vec<PreparedFragment>> {
    section
        .fragments
        .iter()
        .map(|fragment| prepare_fragment(document, fragment, settings))
        .collect()
}

fn prepare_fragment(
    document: &ParsedDocument,
    fragment: &Fragment,
    settings: &ComparerSettings,
) -> Result<PreparedFragment> {
    let serialized = document.serialize_fragment(fragment)?;

    let unlinked = serialize_html(document.document(), fragment.node, HtmlOptions::for_diff())?;
    let markdown = to_markdown(&unlinked);
    let diff_text = if fragment.kind == FragmentKind::Table {
        content_hash_label(&settings.table_hash_prefix, &markdown)
    } else {
        normalize_bullets(&markdown)
    };

    Ok(PreparedFragment {
        serialized,
        diff_text,
        match_text: normalized_text(document.document(), fragment.node).unwrap_or_default(),
    })
}

fn align_runs(old: &[PreparedFragment], new: &[PreparedFragment], settings: &ComparerSettings) -> Vec<AlignedRun> {
    let old_texts: Vec<String> = old.iter().map(|f| f.match_text.clone()).collect();
    let new_texts: Vec<String> = new.iter().map(|f| f.match_text.clone()).collect();
    let matches = match_fragments(&old_texts, &new_texts, &settings.stages);
    debug!(old = old.len(), new = new.len(), matched = matches.len(), "aligned section fragments");

    let mut runs = Vec::new();
    let (mut old_cursor, mut new_cursor) = (0, 0);

    for m in &matches {
        runs.extend(gap_runs(&old[old_cursor..m.old_index], &new[new_cursor..m.new_index], settings));
        runs.push(block_run(
            &old[m.old_index..=m.old_index],
            &new[m.new_index..=m.new_index],
            settings,
        ));
        old_cursor = m.old_index + 1;
        new_cursor = m.new_index + 1;
    }
    runs.extend(gap_runs(&old[old_cursor..], &new[new_cursor..], settings));

    runs
}

/// Runs for the unmatched fragments between two matches.
///
/// One-sided gaps yield one run per fragment; two-sided gaps are diffed as a
/// single block so split or merged paragraphs still line up.
fn gap_runs(old: &[PreparedFragment], new: &[PreparedFragment], settings: &ComparerSettings) -> Vec<AlignedRun> {
    match (old.is_empty(), new.is_empty()) {
        (true, true) => Vec::new(),
        (true, false) => new.iter().map(inserted_run).collect(),
        (false, true) => old.iter().map(deleted_run).collect(),
        (false, false) => vec![block_run(old, new, settings)],
    }
}

fn block_run(old: &[PreparedFragment], new: &[PreparedFragment], settings: &ComparerSettings) -> AlignedRun {
    let join = |fragments: &[PreparedFragment]| {
        let mut text = String::new();
        for (i, fragment) in fragments.iter().enumerate() {
            if i > 0 {
                text.push_str(&settings.fragment_separator);
            }
            text.push_str(&fragment.diff_text);
        }
        text
    };
    let diff = diff_text(&join(old), &join(new));
    run(old, new, diff)
}

fn inserted_run(fragment: &PreparedFragment) -> AlignedRun {
    run(&[], std::slice::from_ref(fragment), diff_text("", &fragment.diff_text))
}

fn deleted_run(fragment: &PreparedFragment) -> AlignedRun {
    run(std::slice::from_ref(fragment), &[], diff_text(&fragment.diff_text, ""))
}

fn run(old: &[PreparedFragment], new: &[PreparedFragment], diff: Vec<DiffOp>) -> AlignedRun {
    let status = DiffStatus::of(&diff);
    AlignedRun {
        old_fragments: old.iter().map(|f| f.serialized.clone()).collect(),
        new_fragments: new.iter().map(|f| f.serialized.clone()).collect(),
        diff,
        added: status.added,
        removed: status.removed,
        changed: status.changed,
    }
}

fn one_sided_section(
    section: &Section,
    fragments: Vec<PreparedFragment>,
    status: SectionStatus,
    settings: &ComparerSettings,
) -> ComparedSection {
    let runs = match status {
        SectionStatus::Deleted => gap_runs(&fragments, &[], settings),
        _ => gap_runs(&[], &fragments, settings),
    };
    compared_section(section, runs, status)
}

fn compared_section(section: &Section, runs: Vec<AlignedRun>, status: SectionStatus) -> ComparedSection {
    ComparedSection {
        id: section.id.clone(),
        title: section.title.clone(),
        page_start: section.page_start,
        page_end: section.page_end,
        runs,
        depth: section.depth,
        kind: section.kind,
        status,
    }
}
