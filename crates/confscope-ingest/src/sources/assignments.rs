//! Program assignment sheet: one row per paper with its session slot.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use confscope_core::{Paper, ScheduleInfo};

use super::spreadsheet::{Row, Table, Workbook};
use crate::error::{IngestError, Result};

pub const PAPER_NUMBER: &str = "Paper number";
pub const TITLE: &str = "Title";
pub const ABSTRACT: &str = "Abstract";
pub const PRESENTER: &str = "Presenters Name";
pub const REGISTERED: &str = "Is Paper Registered?";
pub const PRESENTATION_TYPE: &str = "Type of Presentation";
pub const ATTENDANCE_TYPE: &str = "Attendance Type";
pub const ROOM: &str = "Room Location";
pub const SESSION: &str = "Session";
pub const SESSION_TITLE: &str = "Underline/Whova Session Titles";
pub const SESSION_DATE: &str = "Session Date";
pub const SESSION_TIME: &str = "Session time";
pub const SUB_SESSION: &str = "Sub-session (ex. ML 1, ML 2, etc.)";

/// A schedule row as used by the merge step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleRow {
    pub paper_number: String,
    pub title: String,
    pub abstract_text: String,
    pub schedule: ScheduleInfo,
}

impl ScheduleRow {
    fn from_row(row: &Row<'_>) -> Self {
        Self {
            paper_number: row.get(&[PAPER_NUMBER]).to_string(),
            title: row.get(&[TITLE]).to_string(),
            abstract_text: row.get(&[ABSTRACT]).to_string(),
            schedule: ScheduleInfo {
                presenter_name: row.get(&[PRESENTER]).to_string(),
                is_registered: row.get(&[REGISTERED]).to_string(),
                presentation_type: row.get(&[PRESENTATION_TYPE]).to_string(),
                attendance_type: row.get(&[ATTENDANCE_TYPE]).to_string(),
                room_location: row.get(&[ROOM]).to_string(),
                session: row.get(&[SESSION]).to_string(),
                session_title: row.get(&[SESSION_TITLE]).to_string(),
                session_date: format_session_date(row.get(&[SESSION_DATE])),
                session_time: row.get(&[SESSION_TIME]).to_string(),
                sub_session: row.get(&[SUB_SESSION]).to_string(),
            },
        }
    }

    pub fn into_paper(self) -> Paper {
        let mut paper = Paper::new(self.paper_number, self.title);
        paper.abstract_text = self.abstract_text;
        paper.schedule = self.schedule;
        paper
    }
}

/// Every row of the sheet that has a title, in sheet order.
pub fn schedule_rows(table: &Table) -> Result<Vec<ScheduleRow>> {
    require_column(table, TITLE)?;
    let rows: Vec<_> = table
        .rows()
        .map(|row| ScheduleRow::from_row(&row))
        .filter(|row| !row.title.is_empty())
        .collect();
    debug!(sheet = %table.name, rows = rows.len(), "read schedule rows");
    Ok(rows)
}

/// Papers from the assignment sheet. Rows without a paper number or a
/// title are skipped.
pub fn papers_from_assignments(table: &Table) -> Result<Vec<Paper>> {
    require_column(table, PAPER_NUMBER)?;
    let rows = schedule_rows(table)?;
    let total = rows.len();
    let papers: Vec<Paper> = rows
        .into_iter()
        .filter(|row| !row.paper_number.is_empty())
        .map(ScheduleRow::into_paper)
        .collect();

    if papers.len() < total {
        debug!(skipped = total - papers.len(), "rows without paper number");
    }
    Ok(papers)
}

pub fn load_schedule_rows(path: &Path, sheet: &str, header_row: usize) -> Result<Vec<ScheduleRow>> {
    let mut workbook = Workbook::open(path)?;
    let table = workbook.table(sheet, header_row)?;
    let rows = schedule_rows(&table)?;
    info!(path = %path.display(), sheet, rows = rows.len(), "loaded schedule sheet");
    Ok(rows)
}

pub fn load_assignments(path: &Path, sheet: &str, header_row: usize) -> Result<Vec<Paper>> {
    let mut workbook = Workbook::open(path)?;
    let table = workbook.table(sheet, header_row)?;
    let papers = papers_from_assignments(&table)?;
    info!(path = %path.display(), sheet, papers = papers.len(), "loaded assignment sheet");
    Ok(papers)
}

/// Dates come either as date cells or as text with a midnight time part;
/// both end up as `YYYY-MM-DD`. Anything else is kept verbatim.
pub fn format_session_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return dt.date().format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

fn require_column(table: &Table, column: &str) -> Result<()> {
    if table.has_column(column) {
        Ok(())
    } else {
        Err(IngestError::MissingColumn {
            column: column.to_string(),
            source_name: table.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> Table {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();
        Table::from_rows("ACL 25 Authors Assignments.", rows, 1)
    }

    fn sheet() -> Table {
        table(&[
            &["Fill in the form at https://example.org"],
            &[
                "Paper number", "Title", "Abstract", "Presenters Name",
                "Type of Presentation", "Session", "Session Date", "Session time",
            ],
            &["101", "Graph Parsing", "We parse.", "Ada", "Oral", "Oral 1A", "2025-07-28", "09:00"],
            &["", "Untitled Row", "", "", "Poster", "", "", ""],
            &["102", "", "No title.", "", "Poster", "", "", ""],
            &["103", "Neural MT", "", "Bob", "Poster", "Poster 2", "2025-07-29 00:00:00", ""],
        ])
    }

    #[test]
    fn test_rows_missing_number_or_title_are_skipped() {
        let papers = papers_from_assignments(&sheet()).unwrap();
        let numbers: Vec<_> = papers.iter().map(|p| p.paper_number.as_str()).collect();
        assert_eq!(numbers, vec!["101", "103"]);
    }

    #[test]
    fn test_columns_map_to_paper_fields() {
        let papers = papers_from_assignments(&sheet()).unwrap();
        let first = &papers[0];
        assert_eq!(first.title, "Graph Parsing");
        assert_eq!(first.abstract_text, "We parse.");
        assert_eq!(first.schedule.presenter_name, "Ada");
        assert_eq!(first.schedule.presentation_type, "Oral");
        assert_eq!(first.schedule.session, "Oral 1A");
        assert_eq!(first.schedule.session_date, "2025-07-28");
        assert_eq!(first.schedule.session_time, "09:00");
        assert_eq!(first.schedule.room_location, "");
        assert_eq!(papers[1].schedule.session_date, "2025-07-29");
    }

    #[test]
    fn test_schedule_rows_keep_rows_without_number() {
        let rows = schedule_rows(&sheet()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].title, "Untitled Row");
    }

    #[test]
    fn test_missing_title_column() {
        let bad = table(&[&[""], &["Paper number", "Name"], &["1", "x"]]);
        let err = papers_from_assignments(&bad).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { ref column, .. } if column == "Title"));
    }

    #[test]
    fn test_format_session_date() {
        assert_eq!(format_session_date("2025-07-28 00:00:00"), "2025-07-28");
        assert_eq!(format_session_date(" 2025-07-28 "), "2025-07-28");
        assert_eq!(format_session_date("Monday"), "Monday");
        assert_eq!(format_session_date(""), "");
    }
}
