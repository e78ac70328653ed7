use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Authors file content: slug → entry, kept sorted by slug.
pub type AuthorIndex = BTreeMap<String, AuthorEntry>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorEntry {
    pub name: String,

    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub affiliation: String,

    #[serde(default)]
    pub papers: Vec<AuthorPaper>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coauthors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorPaper {
    pub paper_number: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coauthors: Vec<String>,
}

impl AuthorEntry {
    /// Fold another entry for the same person into this one.
    pub fn absorb(&mut self, other: AuthorEntry) {
        if self.affiliation.trim().is_empty() && !other.affiliation.trim().is_empty() {
            self.affiliation = other.affiliation;
        }
        for paper in other.papers {
            if !self
                .papers
                .iter()
                .any(|p| p.paper_number == paper.paper_number)
            {
                self.papers.push(paper);
            }
        }
        for name in other.coauthors {
            if !self.coauthors.contains(&name) {
                self.coauthors.push(name);
            }
        }
    }
}
