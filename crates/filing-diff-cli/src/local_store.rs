//! Offline filing store: a directory holding `records.json` and the
//! primary documents it points at.

use filing_diff_core::{DocumentFetcher, FilingDiffError, FilingRecord, FilingRepository};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const RECORDS_FILE: &str = "records.json";

pub struct DirectoryRepository {
    records: HashMap<String, FilingRecord>,
}

impl DirectoryRepository {
    pub fn open(dir: &Path) -> filing_diff_core::Result<Self> {
        let text = std::fs::read_to_string(dir.join(RECORDS_FILE))?;
        let records: Vec<FilingRecord> = serde_json::from_str(&text)?;
        Ok(Self {
            records: records.into_iter().map(|record| (record.id.clone(), record)).collect(),
        })
    }
}

impl FilingRepository for DirectoryRepository {
    fn find_filing(&self, id: &str) -> filing_diff_core::Result<FilingRecord> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| FilingDiffError::FilingNotFound { id: id.to_string() })
    }
}

/// Resolves a document URL to the file of the same name in `dir`.
pub struct DirectoryFetcher {
    dir: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(dir: &Path) -> Self {
        Self { dir: dir.to_path_buf() }
    }
}

impl DocumentFetcher for DirectoryFetcher {
    fn fetch(&self, url: &str) -> filing_diff_core::Result<String> {
        let name = url.rsplit('/').next().unwrap_or(url);
        Ok(std::fs::read_to_string(self.dir.join(name))?)
    }
}
