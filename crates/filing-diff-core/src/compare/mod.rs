mod comparer;
mod diff;
mod matching;
mod result;
mod settings;

pub use comparer::{compare_documents, FilingComparer};
pub use diff::{cleanup_semantic, diff_text, DiffStatus};
pub use matching::{apply_stage, match_fragments, FragmentMatch};
pub use result::{
    AlignedRun, ComparedDocument, ComparedSection, ComparisonStatistics, DiffOp, DiffOpKind, SectionStatus,
    SerializedFragment,
};
pub use settings::{ComparerSettings, MatchStage};
