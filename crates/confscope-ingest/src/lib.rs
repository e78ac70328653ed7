//! Title matching, spreadsheet and XML loaders, and the merge passes built on them.

pub mod authors;
pub mod error;
pub mod matching;
pub mod merge;
pub mod report;
pub mod sources;
pub mod text;

pub use authors::{
    build_author_index, count_latex_entries, fix_latex_authors, fix_paper_authors,
};
pub use error::{IngestError, Result};
pub use matching::{CandidateIndex, MatchResult, TitleMatcher, build_index, find_match, normalize};
pub use merge::{merge_posters, merge_schedule};
pub use report::{AnthologySummary, ConvertSummary, FixLatexReport, MatchReport};
