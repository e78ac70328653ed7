//! Attach rows from a secondary source onto papers by title.
//!
//! Each source row is looked up in an index of paper titles; when several
//! rows land on the same paper the last one in source order wins.

pub mod posters;
pub mod schedule;

use tracing::{debug, info};

use confscope_core::{MatchKind, Paper};

use crate::matching::{TitleMatcher, build_index, normalize};
use crate::report::{KeyCollision, MatchReport};

pub use posters::merge_posters;
pub use schedule::merge_schedule;

/// A source row that can be matched to a paper and copied onto it.
pub trait MatchedRow {
    fn title(&self) -> &str;

    /// Sheet the row came from, for per-sheet statistics.
    fn sheet(&self) -> Option<&str> {
        None
    }

    fn apply_to(&self, paper: &mut Paper, kind: MatchKind, score: f64);

    /// Called for papers no row matched.
    fn mark_unmatched(_paper: &mut Paper) {}
}

/// Match `rows` against `papers` and apply every match in place.
pub fn merge_rows<T: MatchedRow>(
    papers: &mut [Paper],
    rows: &[T],
    matcher: &TitleMatcher,
    sample_limit: usize,
) -> MatchReport {
    let index = build_index(0..papers.len(), |&i| papers[i].title.as_str());

    let mut report = MatchReport::new(sample_limit);
    report.papers_total = papers.len();
    report.key_collisions = index
        .collisions()
        .map(|(key, bucket)| KeyCollision {
            key: key.to_string(),
            paper_numbers: bucket
                .iter()
                .map(|&i| papers[i].paper_number.clone())
                .collect(),
        })
        .collect();

    let mut assigned: Vec<Option<(&T, MatchKind, f64)>> = vec![None; papers.len()];
    for row in rows {
        if normalize(row.title()).is_empty() {
            report.record_unmatchable(row.sheet());
            continue;
        }

        let result = matcher.find(&index, row.title());
        report.record(result.kind, row.title(), row.sheet());
        if let Some(&i) = result.record {
            if result.kind == MatchKind::Fuzzy {
                debug!(
                    row = row.title(),
                    paper = %papers[i].title,
                    score = result.score,
                    "fuzzy title match"
                );
            }
            assigned[i] = Some((row, result.kind, result.score));
        }
    }

    for (paper, slot) in papers.iter_mut().zip(assigned) {
        match slot {
            Some((row, kind, score)) => {
                row.apply_to(paper, kind, score);
                report.papers_updated += 1;
            }
            None => T::mark_unmatched(paper),
        }
    }

    info!(
        exact = report.exact,
        fuzzy = report.fuzzy,
        unmatched = report.unmatched,
        updated = report.papers_updated,
        threshold = matcher.threshold(),
        "merged rows into papers"
    );
    report
}

pub(crate) fn non_empty(value: &str) -> Option<String> {
    Some(value.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
