pub mod compare;
pub mod error;
pub mod filing;
pub mod hash;
pub mod service;
pub mod util;
pub mod xml;

pub use error::{FilingDiffError, Result};

pub use compare::{
    compare_documents, AlignedRun, ComparedDocument, ComparedSection, ComparerSettings, ComparisonStatistics, DiffOp,
    DiffOpKind, FilingComparer, MatchStage, SectionStatus, SerializedFragment,
};
pub use filing::{
    parse_filing, DocumentOutline, FilingParser, Fragment, FragmentKind, ParsedDocument, ParserSettings, Section,
    SectionKind, TocEntry,
};
pub use service::{ComparisonService, DocumentFetcher, FilingComparison, FilingRecord, FilingRepository, FormType};
