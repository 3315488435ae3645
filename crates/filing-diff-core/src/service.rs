//! Filing lookup and retrieval around the core parse/compare engine.
//!
//! Storage and transport live outside this crate; they plug in through
//! [`FilingRepository`] and [`DocumentFetcher`].

use crate::compare::{ComparedDocument, ComparerSettings, FilingComparer};
use crate::error::{FilingDiffError, Result};
use crate::filing::{FilingParser, ParsedDocument, ParserSettings};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// SEC form type of a filing. Only annual and quarterly reports can be compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FormType {
    TenK,
    TenQ,
    Other(String),
}

impl FormType {
    pub fn is_supported(&self) -> bool {
        matches!(self, FormType::TenK | FormType::TenQ)
    }
}

impl From<String> for FormType {
    fn from(form: String) -> Self {
        match form.as_str() {
            "10-K" => FormType::TenK,
            "10-Q" => FormType::TenQ,
            _ => FormType::Other(form),
        }
    }
}

impl From<FormType> for String {
    fn from(form: FormType) -> Self {
        form.to_string()
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormType::TenK => write!(f, "10-K"),
            FormType::TenQ => write!(f, "10-Q"),
            FormType::Other(form) => write!(f, "{}", form),
        }
    }
}

/// Filing metadata as kept by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingRecord {
    pub id: String,
    #[serde(default)]
    pub form: Option<FormType>,
    /// File name of the main document inside the filing.
    #[serde(default)]
    pub primary_document: Option<String>,
    /// URL of the filing's `index.json` listing.
    #[serde(default)]
    pub filing_json_index_url: Option<String>,
}

impl FilingRecord {
    /// The primary document sits next to `index.json`.
    pub fn primary_document_url(&self) -> Option<String> {
        let document = self.primary_document.as_deref().filter(|d| !d.is_empty())?;
        let index_url = self.filing_json_index_url.as_deref().filter(|u| !u.is_empty())?;
        Some(index_url.replacen("index.json", document, 1))
    }
}

pub trait FilingRepository {
    /// Fails with [`FilingDiffError::FilingNotFound`] for unknown ids.
    fn find_filing(&self, id: &str) -> Result<FilingRecord>;
}

pub trait DocumentFetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// A filing resolved to its document and parsed.
#[derive(Debug)]
pub struct ResolvedFiling {
    pub record: FilingRecord,
    pub url: String,
    pub document_html: String,
    pub parsed: ParsedDocument,
}

#[derive(Debug)]
pub struct FilingComparison {
    pub new: ResolvedFiling,
    pub old: ResolvedFiling,
    pub comparison: ComparedDocument,
}

pub struct ComparisonService<R, F> {
    repository: R,
    fetcher: F,
    parser_settings: ParserSettings,
    comparer_settings: ComparerSettings,
}

impl<R: FilingRepository, F: DocumentFetcher> ComparisonService<R, F> {
    pub fn new(repository: R, fetcher: F) -> Self {
        Self {
            repository,
            fetcher,
            parser_settings: ParserSettings::default(),
            comparer_settings: ComparerSettings::default(),
        }
    }

    pub fn with_parser_settings(mut self, settings: ParserSettings) -> Self {
        self.parser_settings = settings;
        self
    }

    pub fn with_comparer_settings(mut self, settings: ComparerSettings) -> Self {
        self.comparer_settings = settings;
        self
    }

    pub fn compare_filings(&self, new_id: &str, old_id: &str) -> Result<FilingComparison> {
        let new = self.resolve(new_id)?;
        let old = self.resolve(old_id)?;
        let comparison = FilingComparer::compare(&new.parsed, &old.parsed, Some(&self.comparer_settings))?;

        info!(new = new_id, old = old_id, sections = comparison.sections.len(), "compared filings");
        Ok(FilingComparison { new, old, comparison })
    }

    /// Looks up, validates, fetches and parses one filing.
    pub fn resolve(&self, id: &str) -> Result<ResolvedFiling> {
        let record = self.repository.find_filing(id)?;

        let form = record.form.clone().unwrap_or(FormType::Other(String::new()));
        if !form.is_supported() {
            return Err(FilingDiffError::UnsupportedFormType {
                id: id.to_string(),
                form: form.to_string(),
            });
        }

        let url = record
            .primary_document_url()
            .ok_or_else(|| FilingDiffError::MissingDocumentUrl { id: id.to_string() })?;

        let document_html = self.fetcher.fetch(&url).map_err(|e| match e {
            FilingDiffError::Fetch { .. } => e,
            other => FilingDiffError::Fetch {
                id: id.to_string(),
                message: other.to_string(),
            },
        })?;

        let parsed = FilingParser::parse(&document_html, Some(&self.parser_settings))?;
        Ok(ResolvedFiling {
            record,
            url,
            document_html,
            parsed,
        })
    }
}
