pub mod group;
pub mod lcs;
pub mod markdown;
pub mod similarity;
pub mod strings;

pub use group::group_adjacent;
pub use lcs::{compute_correlation, flatten_correlation, CorrelatedSequence, CorrelationStatus, Hashable};
pub use markdown::{normalize_bullets, to_markdown};
pub use similarity::similarity;
pub use strings::{collapse_whitespace, is_ascii_digits, normalize_text, normalized_text, strip_whitespace};
