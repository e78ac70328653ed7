//! Run summaries printed by the CLI, as text or JSON.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use confscope_core::{MatchKind, Paper};

/// Title lengths shown in text output.
const TITLE_PREVIEW: usize = 80;

/// Outcome of one matching pass over a set of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchReport {
    pub rows: usize,
    pub exact: usize,
    pub fuzzy: usize,
    pub unmatched: usize,
    /// Rows whose title has no usable key; never searched.
    pub unmatchable: usize,
    pub papers_total: usize,
    pub papers_updated: usize,
    pub unmatched_sample: Vec<UnmatchedRow>,
    /// Keys shared by several papers; only the first paper of each is
    /// reachable by title.
    pub key_collisions: Vec<KeyCollision>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sheets: Vec<SheetStats>,
    #[serde(skip)]
    sample_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedRow {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCollision {
    pub key: String,
    pub paper_numbers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetStats {
    pub sheet: String,
    pub matched: usize,
    pub total: usize,
}

impl MatchReport {
    pub fn new(sample_limit: usize) -> Self {
        Self {
            sample_limit,
            ..Default::default()
        }
    }

    pub fn matched(&self) -> usize {
        self.exact + self.fuzzy
    }

    /// Count one row's outcome. `sheet` is tracked only when given.
    pub fn record(&mut self, kind: MatchKind, title: &str, sheet: Option<&str>) {
        self.rows += 1;
        match kind {
            MatchKind::Exact => self.exact += 1,
            MatchKind::Fuzzy => self.fuzzy += 1,
            MatchKind::None => {
                self.unmatched += 1;
                if self.unmatched_sample.len() < self.sample_limit {
                    self.unmatched_sample.push(UnmatchedRow {
                        title: title.to_string(),
                        sheet: sheet.map(str::to_string),
                    });
                }
            }
        }

        if let Some(sheet) = sheet {
            let stats = self.sheet_stats(sheet);
            stats.total += 1;
            if kind.is_match() {
                stats.matched += 1;
            }
        }
    }

    /// Count a row whose title has no usable key. It still belongs to its
    /// sheet's total.
    pub fn record_unmatchable(&mut self, sheet: Option<&str>) {
        self.unmatchable += 1;
        if let Some(sheet) = sheet {
            self.sheet_stats(sheet).total += 1;
        }
    }

    fn sheet_stats(&mut self, sheet: &str) -> &mut SheetStats {
        let pos = match self.sheets.iter().position(|s| s.sheet == sheet) {
            Some(pos) => pos,
            None => {
                self.sheets.push(SheetStats {
                    sheet: sheet.to_string(),
                    matched: 0,
                    total: 0,
                });
                self.sheets.len() - 1
            }
        };
        &mut self.sheets[pos]
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matching completed:")?;
        writeln!(f, "  Exact matches: {}", self.exact)?;
        writeln!(f, "  Fuzzy matches: {}", self.fuzzy)?;
        writeln!(f, "  Total matched: {}/{}", self.matched(), self.rows)?;
        writeln!(f, "  Unmatched: {}", self.unmatched)?;
        if self.unmatchable > 0 {
            writeln!(f, "  Rows without a usable title: {}", self.unmatchable)?;
        }

        if !self.unmatched_sample.is_empty() {
            writeln!(f, "\nFirst {} unmatched titles:", self.unmatched_sample.len())?;
            for (i, row) in self.unmatched_sample.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, preview(&row.title))?;
                if let Some(sheet) = &row.sheet {
                    writeln!(f, "      Sheet: {sheet}")?;
                }
            }
        }

        if !self.sheets.is_empty() {
            writeln!(f, "\nMatches by sheet:")?;
            for stats in &self.sheets {
                writeln!(f, "  {}: {}/{} matched", stats.sheet, stats.matched, stats.total)?;
            }
        }

        if !self.key_collisions.is_empty() {
            writeln!(f, "\nTitles shared by several papers (first one wins):")?;
            for collision in &self.key_collisions {
                writeln!(f, "  {}: {}", collision.key, collision.paper_numbers.join(", "))?;
            }
        }

        write!(
            f,
            "\nPapers updated: {}/{}",
            self.papers_updated, self.papers_total
        )
    }
}

/// Counts from the assignment sheet conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConvertSummary {
    pub papers: usize,
    pub presentation_types: Vec<TypeCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub presentation_type: String,
    pub count: usize,
}

impl ConvertSummary {
    /// Presentation types are listed in first-seen order.
    pub fn from_papers(papers: &[Paper]) -> Self {
        let mut presentation_types: Vec<TypeCount> = Vec::new();
        for paper in papers {
            let kind = &paper.schedule.presentation_type;
            match presentation_types
                .iter_mut()
                .find(|t| &t.presentation_type == kind)
            {
                Some(entry) => entry.count += 1,
                None => presentation_types.push(TypeCount {
                    presentation_type: kind.clone(),
                    count: 1,
                }),
            }
        }
        Self {
            papers: papers.len(),
            presentation_types,
        }
    }
}

impl fmt::Display for ConvertSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Processed {} papers", self.papers)?;
        write!(f, "\nPresentation types:")?;
        for entry in &self.presentation_types {
            write!(f, "\n  {}: {}", entry.presentation_type, entry.count)?;
        }
        Ok(())
    }
}

/// Counts from an anthology import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnthologySummary {
    pub papers: usize,
    pub with_abstract: usize,
    pub unique_authors: usize,
    pub author_entries: usize,
}

impl AnthologySummary {
    /// Unique authors are counted by full name.
    pub fn from_papers(papers: &[Paper], author_entries: usize) -> Self {
        let unique_authors = papers
            .iter()
            .flat_map(|paper| paper.authors.iter().map(|a| a.full_name.as_str()))
            .collect::<HashSet<_>>()
            .len();
        Self {
            papers: papers.len(),
            with_abstract: papers
                .iter()
                .filter(|paper| !paper.abstract_text.is_empty())
                .count(),
            unique_authors,
            author_entries,
        }
    }
}

impl fmt::Display for AnthologySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Processed {} papers", self.papers)?;
        writeln!(f, "Papers with abstracts: {}/{}", self.with_abstract, self.papers)?;
        writeln!(f, "Unique authors: {}", self.unique_authors)?;
        write!(f, "Author entries written: {}", self.author_entries)
    }
}

/// One author entry whose name or slug changed during LaTeX repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameChange {
    pub old_slug: String,
    pub new_slug: String,
    pub old_name: String,
    pub new_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FixLatexReport {
    pub authors_before: usize,
    pub authors_after: usize,
    /// Entries holding LaTeX sequences before the repair.
    pub latex_entries: usize,
    pub changes: Vec<NameChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub papers_fixed: Option<usize>,
}

impl fmt::Display for FixLatexReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Found {} entries with LaTeX sequences", self.latex_entries)?;
        if !self.changes.is_empty() {
            writeln!(f, "Renamed or re-keyed entries: {}", self.changes.len())?;
        }
        for change in &self.changes {
            writeln!(f, "  {} -> {}", change.old_slug, change.new_slug)?;
            writeln!(f, "    {} -> {}", change.old_name, change.new_name)?;
        }
        if let Some(papers) = self.papers_fixed {
            writeln!(f, "Papers with repaired author names: {papers}")?;
        }
        write!(f, "Authors: {} -> {}", self.authors_before, self.authors_after)
    }
}

fn preview(title: &str) -> String {
    if title.chars().count() <= TITLE_PREVIEW {
        title.to_string()
    } else {
        let cut: String = title.chars().take(TITLE_PREVIEW).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_and_samples() {
        let mut report = MatchReport::new(1);
        report.record(MatchKind::Exact, "A", Some("Posters 1"));
        report.record(MatchKind::Fuzzy, "B", Some("Posters 2"));
        report.record(MatchKind::None, "C", Some("Posters 1"));
        report.record(MatchKind::None, "D", None);

        assert_eq!(report.rows, 4);
        assert_eq!(report.matched(), 2);
        assert_eq!(report.unmatched, 2);
        assert_eq!(
            report.unmatched_sample,
            vec![UnmatchedRow {
                title: "C".to_string(),
                sheet: Some("Posters 1".to_string()),
            }]
        );
        assert_eq!(
            report.sheets,
            vec![
                SheetStats { sheet: "Posters 1".to_string(), matched: 1, total: 2 },
                SheetStats { sheet: "Posters 2".to_string(), matched: 1, total: 1 },
            ]
        );
    }

    #[test]
    fn test_unmatchable_rows_count_toward_sheet_total() {
        let mut report = MatchReport::new(5);
        report.record(MatchKind::Exact, "A", Some("Posters 1"));
        report.record_unmatchable(Some("Posters 1"));
        report.record_unmatchable(None);

        assert_eq!(report.rows, 1);
        assert_eq!(report.unmatchable, 2);
        assert_eq!(
            report.sheets,
            vec![SheetStats { sheet: "Posters 1".to_string(), matched: 1, total: 2 }]
        );
    }

    #[test]
    fn test_fix_latex_report_text() {
        let report = FixLatexReport {
            authors_before: 3,
            authors_after: 2,
            latex_entries: 1,
            changes: vec![NameChange {
                old_slug: "goran-glavav-s".to_string(),
                new_slug: "goran-glavas".to_string(),
                old_name: r"Goran Glava\v{s}".to_string(),
                new_name: "Goran Glavaš".to_string(),
            }],
            papers_fixed: None,
        };

        let text = report.to_string();
        assert!(text.starts_with("Found 1 entries with LaTeX sequences"));
        assert!(text.contains("  goran-glavav-s -> goran-glavas"));
        assert!(!text.contains("Papers with repaired"));
        assert!(text.ends_with("Authors: 3 -> 2"));
    }

    #[test]
    fn test_match_report_text() {
        let mut report = MatchReport::new(5);
        report.record(MatchKind::Exact, "Graph Parsing", None);
        report.record(MatchKind::None, &"x".repeat(100), None);
        report.papers_total = 3;
        report.papers_updated = 1;

        let text = report.to_string();
        assert!(text.contains("Exact matches: 1"));
        assert!(text.contains("Total matched: 1/2"));
        assert!(text.contains(&format!("1. {}...", "x".repeat(80))));
        assert!(text.ends_with("Papers updated: 1/3"));
        assert!(!text.contains("Matches by sheet"));
    }

    #[test]
    fn test_match_report_json_omits_sample_limit() {
        let report = MatchReport::new(5);
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("sample_limit").is_none());
        assert!(value.get("sheets").is_none());
        assert_eq!(value["exact"], 0);
    }

    #[test]
    fn test_convert_summary_keeps_first_seen_order() {
        let mut papers = vec![Paper::new("1", "a"), Paper::new("2", "b"), Paper::new("3", "c")];
        papers[0].schedule.presentation_type = "Poster".to_string();
        papers[1].schedule.presentation_type = "Oral".to_string();
        papers[2].schedule.presentation_type = "Poster".to_string();

        let summary = ConvertSummary::from_papers(&papers);
        assert_eq!(summary.papers, 3);
        assert_eq!(summary.presentation_types[0].presentation_type, "Poster");
        assert_eq!(summary.presentation_types[0].count, 2);
        assert_eq!(summary.presentation_types[1].count, 1);
        assert!(summary.to_string().contains("  Oral: 1"));
    }
}
