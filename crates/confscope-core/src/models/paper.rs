use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::MatchKind;

/// One paper of the conference program.
///
/// Papers are assembled from several partial sources (assignment sheet,
/// anthology XML, poster sheets), so every source-specific block is optional
/// and keys not modelled here are carried through `extra` untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paper {
    pub paper_number: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, rename = "abstract")]
    pub abstract_text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xml_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<PaperAuthor>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub author_names: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bibkey: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    #[serde(flatten)]
    pub schedule: ScheduleInfo,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excel_matched: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excel_match_type: Option<MatchKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excel_match_confidence: Option<f64>,

    #[serde(flatten)]
    pub poster: PosterPlacement,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Paper {
    pub fn new(paper_number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            paper_number: paper_number.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn has_poster(&self) -> bool {
        self.poster
            .poster_board
            .as_deref()
            .is_some_and(|board| !board.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperAuthor {
    #[serde(default)]
    pub first: String,
    #[serde(default)]
    pub last: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
}

impl PaperAuthor {
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        let first = first.into();
        let last = last.into();
        let full_name = format!("{first} {last}").trim().to_string();
        Self {
            first,
            last,
            full_name,
            affiliation: None,
        }
    }
}

/// Session and presenter data from the program assignment sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleInfo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub presenter_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub is_registered: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub presentation_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub attendance_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub room_location: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub session: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub session_title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub session_date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub session_time: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sub_session: String,
}

/// Poster hall and board assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosterPlacement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_hall: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_board: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_session: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_session_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_session_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_match_type: Option<MatchKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_match_confidence: Option<f64>,
}
