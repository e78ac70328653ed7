//! Poster-board sheets: hall and board number per accepted paper.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use confscope_core::config::SheetsConfig;

use super::spreadsheet::{Row, Table, Workbook};
use crate::error::Result;

const TITLE: &[&str] = &["Title"];
const HALL: &[&str] = &["Hall Location", "Hall #", "Hall"];
const BOARD: &[&str] = &["Board  #", "Board #", "Board"];
const PAPER_ID: &[&str] = &["Paper ID", "Paper number"];
const SESSION: &[&str] = &["Session"];
const SESSION_DATE: &[&str] = &["Session Date"];
const SESSION_TIME: &[&str] = &["Session time", "Session Time"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PosterEntry {
    pub title: String,
    pub hall: String,
    pub board_number: String,
    pub paper_id: String,
    pub session: String,
    pub session_date: String,
    pub session_time: String,
    pub sheet_name: String,
}

impl PosterEntry {
    fn from_row(row: &Row<'_>, sheet: &str) -> Self {
        Self {
            title: row.get(TITLE).to_string(),
            hall: row.get(HALL).to_string(),
            board_number: row.get(BOARD).to_string(),
            paper_id: row.get(PAPER_ID).to_string(),
            session: row.get(SESSION).to_string(),
            session_date: row.get(SESSION_DATE).to_string(),
            session_time: row.get(SESSION_TIME).to_string(),
            sheet_name: sheet.to_string(),
        }
    }
}

/// Poster entries of a workbook plus the sheets they came from.
#[derive(Debug, Clone, Default)]
pub struct PosterSheets {
    pub entries: Vec<PosterEntry>,
    pub sheets: Vec<String>,
    pub skipped_sheets: Vec<String>,
}

/// A sheet holds posters when its name mentions one of `keywords` and
/// none of `excludes`, ignoring case.
pub fn is_poster_sheet(name: &str, keywords: &[String], excludes: &[String]) -> bool {
    let name = name.to_lowercase();
    keywords.iter().any(|k| name.contains(&k.to_lowercase()))
        && !excludes.iter().any(|e| name.contains(&e.to_lowercase()))
}

/// Entries with both a title and a board number. Sheets without a
/// `Title` column yield nothing.
pub fn poster_entries(table: &Table) -> Vec<PosterEntry> {
    if !table.has_column(TITLE[0]) {
        return Vec::new();
    }
    table
        .rows()
        .map(|row| PosterEntry::from_row(&row, &table.name))
        .filter(|entry| !entry.title.is_empty() && !entry.board_number.is_empty())
        .collect()
}

pub fn load_poster_sheets(path: &Path, config: &SheetsConfig) -> Result<PosterSheets> {
    let mut workbook = Workbook::open(path)?;
    let names = workbook.sheet_names();
    debug!(sheets = ?names, "available sheets");

    let mut loaded = PosterSheets::default();
    for name in names {
        if !is_poster_sheet(&name, &config.poster_sheet_keywords, &config.poster_sheet_excludes) {
            continue;
        }

        let table = workbook.table(&name, config.header_row)?;
        if table.is_empty() {
            debug!(sheet = %name, "skipping empty sheet");
            loaded.skipped_sheets.push(name);
            continue;
        }
        if !table.has_column(TITLE[0]) {
            warn!(sheet = %name, "skipping sheet without Title column");
            loaded.skipped_sheets.push(name);
            continue;
        }

        let entries = poster_entries(&table);
        debug!(sheet = %name, entries = entries.len(), "read poster sheet");
        loaded.entries.extend(entries);
        loaded.sheets.push(name);
    }

    info!(
        path = %path.display(),
        entries = loaded.entries.len(),
        sheets = loaded.sheets.len(),
        "loaded poster boards"
    );
    Ok(loaded)
}
