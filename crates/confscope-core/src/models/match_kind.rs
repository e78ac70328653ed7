use serde::{Deserialize, Serialize};

/// How a record from one source was tied to a paper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Normalized titles are identical.
    Exact,
    /// Normalized titles differ but score above the caller's threshold.
    Fuzzy,
    #[default]
    None,
}

impl MatchKind {
    pub fn is_match(self) -> bool {
        !matches!(self, MatchKind::None)
    }
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchKind::Exact => "exact",
            MatchKind::Fuzzy => "fuzzy",
            MatchKind::None => "none",
        };
        write!(f, "{s}")
    }
}
