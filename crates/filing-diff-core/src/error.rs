use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilingDiffError {
    #[error("XML parsing error at {location}: {message}")]
    XmlParse { message: String, location: String },

    #[error("XML serialization error: {0}")]
    XmlWrite(String),

    #[error("Document has no body element")]
    MissingBody,

    #[error("No \"{marker}\" marker found in document")]
    MissingTableOfContents { marker: String },

    #[error("Table of contents marker found but no table follows it")]
    MissingTocTable,

    #[error("Table of contents contains no linked entries")]
    EmptyTableOfContents,

    #[error("Table of contents entry '{title}' links to unknown anchor '{id}'")]
    UnresolvedTocEntry { id: String, title: String },

    #[error("Filing '{id}' not found")]
    FilingNotFound { id: String },

    #[error("Filing '{id}' has unsupported form type '{form}' (expected 10-K or 10-Q)")]
    UnsupportedFormType { id: String, form: String },

    #[error("Filing '{id}' has no primary document URL")]
    MissingDocumentUrl { id: String },

    #[error("Failed to fetch filing '{id}': {message}")]
    Fetch { id: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FilingDiffError>;
