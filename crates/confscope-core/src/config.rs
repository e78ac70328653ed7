use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfscopeError, Result};

/// Root configuration, loaded from `~/.config/confscope/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfscopeConfig {
    pub paths: PathsConfig,
    pub matching: MatchingConfig,
    pub sheets: SheetsConfig,
    pub anthology: AnthologyConfig,
}

/// Where the JSON datasets live. Relative names resolve against `data_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: String,
    pub papers_file: String,
    pub merged_file: String,
    pub authors_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum fuzzy score (exclusive) for spreadsheet schedule rows.
    pub schedule_threshold: f64,
    /// Minimum fuzzy score (exclusive) for poster-board rows.
    pub poster_threshold: f64,
    pub metric: SimilarityMetric,
    /// How many unmatched titles a report prints.
    pub unmatched_sample: usize,
}

/// String similarity used for the fuzzy fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    /// Matching-blocks ratio `2*M/T`.
    #[default]
    Ratcliff,
    /// `1 - levenshtein / max_len`.
    Levenshtein,
}

impl std::fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SimilarityMetric::Ratcliff => "ratcliff",
            SimilarityMetric::Levenshtein => "levenshtein",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for SimilarityMetric {
    type Err = ConfscopeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ratcliff" | "ratio" => Ok(Self::Ratcliff),
            "levenshtein" => Ok(Self::Levenshtein),
            other => Err(ConfscopeError::ConfigError(format!(
                "unknown similarity metric: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    pub assignments_sheet: String,
    /// Zero-based row holding the column headers. Rows above it are skipped.
    pub header_row: usize,
    pub poster_sheet_keywords: Vec<String>,
    pub poster_sheet_excludes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthologyConfig {
    pub year: i32,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: ".".to_string(),
            papers_file: "papers.json".to_string(),
            merged_file: "papers_merged.json".to_string(),
            authors_file: "authors.json".to_string(),
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            schedule_threshold: 0.90,
            poster_threshold: 0.85,
            metric: SimilarityMetric::Ratcliff,
            unmatched_sample: 5,
        }
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            assignments_sheet: "ACL 25 Authors Assignments.".to_string(),
            header_row: 1,
            poster_sheet_keywords: vec!["poster".to_string(), "findings".to_string()],
            poster_sheet_excludes: vec!["monitor".to_string()],
        }
    }
}

impl Default for AnthologyConfig {
    fn default() -> Self {
        Self { year: 2025 }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl ConfscopeConfig {
    /// Standard config file path: `~/.config/confscope/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("CONFSCOPE_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("confscope")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("matching.schedule_threshold", self.matching.schedule_threshold),
            ("matching.poster_threshold", self.matching.poster_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfscopeError::ConfigError(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }

    // ─── Derived paths ─────────────────────────────────────

    pub fn papers_path(&self) -> PathBuf {
        self.resolve(&self.paths.papers_file)
    }

    pub fn merged_path(&self) -> PathBuf {
        self.resolve(&self.paths.merged_file)
    }

    pub fn authors_path(&self) -> PathBuf {
        self.resolve(&self.paths.authors_file)
    }

    fn resolve(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            PathBuf::from(&self.paths.data_dir).join(path)
        }
    }
}
