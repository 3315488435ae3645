use crate::error::Result;
use crate::filing::{FragmentKind, SectionKind};
use serde::{Deserialize, Serialize};

/// Rendering-ready copy of a fragment, independent of the parsed tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedFragment {
    pub kind: FragmentKind,
    pub html: String,
    pub markdown: String,
    pub page: u32,
    pub preceding_anchor_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffOpKind {
    Equal,
    Insert,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOp {
    pub op: DiffOpKind,
    pub text: String,
}

impl DiffOp {
    pub fn equal(text: impl Into<String>) -> Self {
        Self { op: DiffOpKind::Equal, text: text.into() }
    }

    pub fn insert(text: impl Into<String>) -> Self {
        Self { op: DiffOpKind::Insert, text: text.into() }
    }

    pub fn delete(text: impl Into<String>) -> Self {
        Self { op: DiffOpKind::Delete, text: text.into() }
    }
}

/// One aligned (or deliberately unaligned) stretch of fragments and its diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignedRun {
    pub old_fragments: Vec<SerializedFragment>,
    pub new_fragments: Vec<SerializedFragment>,
    pub diff: Vec<DiffOp>,
    pub added: bool,
    pub removed: bool,
    pub changed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionStatus {
    /// Present in both documents under the same title.
    Matched,
    /// Only in the new document.
    Inserted,
    /// Only in the old document.
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparedSection {
    pub id: String,
    pub title: String,
    pub page_start: u32,
    pub page_end: u32,
    pub runs: Vec<AlignedRun>,
    pub depth: u32,
    pub kind: SectionKind,
    pub status: SectionStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparedDocument {
    pub sections: Vec<ComparedSection>,
}

impl ComparedDocument {
    pub fn statistics(&self) -> ComparisonStatistics {
        let mut stats = ComparisonStatistics::default();
        for section in &self.sections {
            match section.status {
                SectionStatus::Matched => stats.sections_matched += 1,
                SectionStatus::Inserted => stats.sections_inserted += 1,
                SectionStatus::Deleted => stats.sections_deleted += 1,
            }
            for run in &section.runs {
                if run.added {
                    stats.runs_added += 1;
                } else if run.removed {
                    stats.runs_removed += 1;
                } else if run.changed {
                    stats.runs_changed += 1;
                } else {
                    stats.runs_unchanged += 1;
                }
            }
        }
        stats
    }

    pub fn has_changes(&self) -> bool {
        self.sections
            .iter()
            .any(|section| section.status != SectionStatus::Matched || section.runs.iter().any(|run| run.changed))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Section and run counts. Each run is counted once: added, removed, changed
/// (edited in place) or unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonStatistics {
    pub sections_matched: usize,
    pub sections_inserted: usize,
    pub sections_deleted: usize,
    pub runs_added: usize,
    pub runs_removed: usize,
    pub runs_changed: usize,
    pub runs_unchanged: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(added: bool, removed: bool, changed: bool) -> AlignedRun {
        AlignedRun {
            old_fragments: vec![],
            new_fragments: vec![],
            diff: vec![],
            added,
            removed,
            changed,
        }
    }

    fn section(status: SectionStatus, runs: Vec<AlignedRun>) -> ComparedSection {
        ComparedSection {
            id: "s".to_string(),
            title: "Section".to_string(),
            page_start: 1,
            page_end: 1,
            runs,
            depth: 0,
            kind: SectionKind::General,
            status,
        }
    }

    #[test]
    fn statistics_count_each_run_once() {
        let document = ComparedDocument {
            sections: vec![
                section(SectionStatus::Matched, vec![run(false, false, false), run(false, false, true)]),
                section(SectionStatus::Inserted, vec![run(true, false, true)]),
                section(SectionStatus::Deleted, vec![run(false, true, true), run(false, true, true)]),
            ],
        };

        assert_eq!(
            document.statistics(),
            ComparisonStatistics {
                sections_matched: 1,
                sections_inserted: 1,
                sections_deleted: 1,
                runs_added: 1,
                runs_removed: 2,
                runs_changed: 1,
                runs_unchanged: 1,
            }
        );
        assert!(document.has_changes());
    }

    #[test]
    fn unchanged_document_has_no_changes() {
        let document = ComparedDocument {
            sections: vec![section(SectionStatus::Matched, vec![run(false, false, false)])],
        };
        assert!(!document.has_changes());
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let document = ComparedDocument {
            sections: vec![section(SectionStatus::Matched, vec![AlignedRun {
                diff: vec![DiffOp::equal("Net sales"), DiffOp::insert(" rose")],
                ..run(true, false, true)
            }])],
        };
        let json: serde_json::Value = serde_json::from_str(&document.to_json().unwrap()).unwrap();
        let section = &json["sections"][0];

        assert_eq!(section["pageStart"], 1);
        assert_eq!(section["status"], "matched");
        assert_eq!(section["runs"][0]["diff"][1]["op"], "insert");
        assert_eq!(section["runs"][0]["oldFragments"], serde_json::json!([]));
    }
}
