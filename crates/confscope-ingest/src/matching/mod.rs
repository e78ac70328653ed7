//! Title normalization and exact-then-fuzzy title lookup.

pub mod index;
pub mod normalize;
pub mod similarity;

pub use index::{CandidateIndex, MatchResult, TitleMatcher, build_index, find_match};
pub use normalize::{normalize, normalize_opt};
pub use similarity::{sequence_ratio, similarity};
