use confscope_core::{MatchKind, Paper};

use super::{MatchedRow, merge_rows};
use crate::matching::TitleMatcher;
use crate::report::MatchReport;
use crate::sources::ScheduleRow;

impl MatchedRow for ScheduleRow {
    fn title(&self) -> &str {
        &self.title
    }

    fn apply_to(&self, paper: &mut Paper, kind: MatchKind, score: f64) {
        paper.schedule = self.schedule.clone();
        if !self.abstract_text.is_empty() {
            paper.abstract_text = self.abstract_text.clone();
        }
        paper.excel_matched = Some(true);
        paper.excel_match_type = Some(kind);
        paper.excel_match_confidence = Some(score);
    }

    fn mark_unmatched(paper: &mut Paper) {
        paper.excel_matched = Some(false);
    }
}

/// Copy session data from the schedule sheet onto matching papers. Papers
/// without a schedule row are marked `excel_matched = false`.
pub fn merge_schedule(
    papers: &mut [Paper],
    rows: &[ScheduleRow],
    matcher: &TitleMatcher,
    sample_limit: usize,
) -> MatchReport {
    merge_rows(papers, rows, matcher, sample_limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use confscope_core::ScheduleInfo;

    fn row(title: &str, session: &str, abstract_text: &str) -> ScheduleRow {
        ScheduleRow {
            paper_number: String::new(),
            title: title.to_string(),
            abstract_text: abstract_text.to_string(),
            schedule: ScheduleInfo {
                session: session.to_string(),
                presenter_name: "Ada".to_string(),
                ..Default::default()
            },
        }
    }

    fn papers() -> Vec<Paper> {
        let mut papers = vec![
            Paper::new("p1", "Neural Machine Translation"),
            Paper::new("p2", "Graph Parsing with Transformers"),
            Paper::new("p3", "Quantum Computing Basics"),
        ];
        papers[0].abstract_text = "Original abstract.".to_string();
        papers
    }

    #[test]
    fn test_exact_and_fuzzy_rows_are_applied() {
        let mut papers = papers();
        let rows = vec![
            row("Neural  Machine Translation!!", "Oral 1A", ""),
            row("Graph Parsing with Transformer", "Poster 2", "New abstract."),
            row("Completely Different Research Topic", "Oral 9", ""),
        ];

        let report = merge_schedule(&mut papers, &rows, &TitleMatcher::new(0.90), 5);
        assert_eq!(report.exact, 1);
        assert_eq!(report.fuzzy, 1);
        assert_eq!(report.unmatched, 1);
        assert_eq!(report.papers_updated, 2);
        assert_eq!(report.unmatched_sample[0].title, "Completely Different Research Topic");

        assert_eq!(papers[0].schedule.session, "Oral 1A");
        assert_eq!(papers[0].abstract_text, "Original abstract.");
        assert_eq!(papers[0].excel_match_type, Some(MatchKind::Exact));
        assert_eq!(papers[0].excel_match_confidence, Some(1.0));

        assert_eq!(papers[1].schedule.session, "Poster 2");
        assert_eq!(papers[1].abstract_text, "New abstract.");
        assert_eq!(papers[1].excel_match_type, Some(MatchKind::Fuzzy));
        assert!(papers[1].excel_match_confidence.unwrap() > 0.90);

        assert_eq!(papers[2].excel_matched, Some(false));
        assert!(papers[2].schedule.session.is_empty());
    }

    #[test]
    fn test_last_matching_row_wins() {
        let mut papers = papers();
        let rows = vec![
            row("Neural Machine Translation", "Oral 1A", ""),
            row("Neural Machine Translation", "Oral 2B", ""),
        ];
        let report = merge_schedule(&mut papers, &rows, &TitleMatcher::new(0.90), 5);
        assert_eq!(report.exact, 2);
        assert_eq!(report.papers_updated, 1);
        assert_eq!(papers[0].schedule.session, "Oral 2B");
    }

    #[test]
    fn test_rows_without_key_are_not_searched() {
        let mut papers = papers();
        let rows = vec![row("On the", "Oral 1A", "")];
        let report = merge_schedule(&mut papers, &rows, &TitleMatcher::new(0.0), 5);
        assert_eq!(report.unmatchable, 1);
        assert_eq!(report.rows, 0);
        assert!(papers.iter().all(|p| p.excel_matched == Some(false)));
    }

    #[test]
    fn test_colliding_titles_are_reported() {
        let mut papers = papers();
        papers.push(Paper::new("p4", "Neural Machine Translation."));
        let report = merge_schedule(&mut papers, &[], &TitleMatcher::new(0.90), 5);
        assert_eq!(report.key_collisions.len(), 1);
        assert_eq!(report.key_collisions[0].paper_numbers, vec!["p1", "p4"]);
    }
}
