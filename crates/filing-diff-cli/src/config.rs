use anyhow::{Context, Result};
use filing_diff_core::{ComparerSettings, ParserSettings};
use serde::Deserialize;
use std::path::Path;

/// Contents of the `--config` file. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub parser: ParserSettings,
    pub comparer: ComparerSettings,
}

impl CliConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}
