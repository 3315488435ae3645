mod fragments;
mod normalize;
mod pages;
mod parser;
mod sections;
mod settings;
mod toc;
mod types;

pub use fragments::classify_fragments;
pub use normalize::unwrap_inline_tags;
pub use pages::{build_page_index, page_at};
pub use parser::{parse_filing, FilingParser};
pub use sections::{assemble_sections, TOC_SECTION_ID, TOC_SECTION_TITLE};
pub use settings::ParserSettings;
pub use toc::extract_table_of_contents;
pub use types::{
    DocumentOutline, Fragment, FragmentKind, PageBreak, ParsedDocument, Section, SectionKind, SectionOutline,
    TocEntry,
};
