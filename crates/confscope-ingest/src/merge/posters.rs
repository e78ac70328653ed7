use confscope_core::{MatchKind, Paper, PosterPlacement};

use super::{MatchedRow, merge_rows, non_empty};
use crate::matching::TitleMatcher;
use crate::report::MatchReport;
use crate::sources::PosterEntry;

impl MatchedRow for PosterEntry {
    fn title(&self) -> &str {
        &self.title
    }

    fn sheet(&self) -> Option<&str> {
        Some(&self.sheet_name)
    }

    fn apply_to(&self, paper: &mut Paper, kind: MatchKind, score: f64) {
        paper.poster = PosterPlacement {
            poster_hall: non_empty(&self.hall),
            poster_board: non_empty(&self.board_number),
            poster_session: non_empty(&self.session),
            poster_session_date: non_empty(&self.session_date),
            poster_session_time: non_empty(&self.session_time),
            poster_match_type: Some(kind),
            poster_match_confidence: Some(score),
        };
    }
}

/// Attach hall and board numbers to matching papers. Unmatched papers keep
/// whatever placement they had.
pub fn merge_posters(
    papers: &mut [Paper],
    entries: &[PosterEntry],
    matcher: &TitleMatcher,
    sample_limit: usize,
) -> MatchReport {
    merge_rows(papers, entries, matcher, sample_limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, board: &str, sheet: &str) -> PosterEntry {
        PosterEntry {
            title: title.to_string(),
            hall: "Hall X".to_string(),
            board_number: board.to_string(),
            sheet_name: sheet.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_untitled_rows_stay_in_sheet_total() {
        let mut papers = vec![Paper::new("p1", "Graph Parsing")];
        let entries = vec![
            entry("Graph Parsing", "7", "Posters Day 1"),
            entry("?!", "8", "Posters Day 1"),
        ];

        let report = merge_posters(&mut papers, &entries, &TitleMatcher::new(0.85), 5);
        assert_eq!(report.exact, 1);
        assert_eq!(report.unmatchable, 1);
        assert_eq!(report.sheets[0].matched, 1);
        assert_eq!(report.sheets[0].total, 2);
        assert!(report.to_string().contains("Posters Day 1: 1/2 matched"));
    }

    #[test]
    fn test_posters_attach_placement_and_sheet_stats() {
        let mut papers = vec![
            Paper::new("p1", "Neural Machine Translation"),
            Paper::new("p2", "Graph Parsing"),
        ];
        papers[1].poster.poster_board = Some("99".to_string());

        let entries = vec![
            entry("Neural Machine Translations", "12", "Posters Day 1"),
            entry("Speech Recognition in the Wild", "13", "Posters Day 1"),
            entry("Findings Only Title Here", "14", "Findings"),
        ];

        let report = merge_posters(&mut papers, &entries, &TitleMatcher::new(0.85), 5);
        assert_eq!(report.fuzzy, 1);
        assert_eq!(report.unmatched, 2);
        assert_eq!(report.sheets.len(), 2);
        assert_eq!(report.sheets[0].matched, 1);
        assert_eq!(report.sheets[0].total, 2);
        assert_eq!(report.sheets[1].matched, 0);
        assert_eq!(report.unmatched_sample[0].sheet.as_deref(), Some("Posters Day 1"));

        let placed = &papers[0].poster;
        assert_eq!(placed.poster_board.as_deref(), Some("12"));
        assert_eq!(placed.poster_hall.as_deref(), Some("Hall X"));
        assert_eq!(placed.poster_session, None);
        assert_eq!(placed.poster_match_type, Some(MatchKind::Fuzzy));
        assert!(papers[0].has_poster());

        assert_eq!(papers[1].poster.poster_board.as_deref(), Some("99"));
        assert_eq!(papers[1].excel_matched, None);
    }
}
