use serde::{Deserialize, Serialize};

/// One fragment-matching pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MatchStage {
    /// Identical normalized text.
    Exact,
    /// Levenshtein similarity strictly above `threshold`.
    Similar { threshold: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparerSettings {
    /// Matching passes, applied in order over the same partial assignment.
    pub stages: Vec<MatchStage>,

    /// Joins the diff text of several fragments compared as one block.
    pub fragment_separator: String,

    /// Prefix of the hash label that stands in for a table's diff text.
    pub table_hash_prefix: String,
}

impl Default for ComparerSettings {
    fn default() -> Self {
        Self {
            stages: vec![
                MatchStage::Exact,
                MatchStage::Similar { threshold: 0.90 },
                MatchStage::Similar { threshold: 0.50 },
            ],
            fragment_separator: "\n\n".to_string(),
            table_hash_prefix: "Table hash: ".to_string(),
        }
    }
}

impl ComparerSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stages(mut self, stages: Vec<MatchStage>) -> Self {
        self.stages = stages;
        self
    }

    pub fn with_fragment_separator(mut self, separator: &str) -> Self {
        self.fragment_separator = separator.to_string();
        self
    }

    pub fn with_table_hash_prefix(mut self, prefix: &str) -> Self {
        self.table_hash_prefix = prefix.to_string();
        self
    }
}
