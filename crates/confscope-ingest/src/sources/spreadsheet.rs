//! Tabular input: Excel/ODS workbooks via calamine, CSV/TSV via csv.
//!
//! Every sheet is turned into a [`Table`] of trimmed strings keyed by the
//! header row, which is what the assignment and poster loaders work on.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use tracing::debug;

use confscope_core::ConfscopeError;

use crate::error::{IngestError, Result};

/// An opened workbook or delimited file.
pub struct Workbook {
    inner: Inner,
}

enum Inner {
    Spreadsheet(Sheets<BufReader<File>>),
    /// CSV and TSV hold exactly one sheet, named after the file stem.
    Delimited { name: String, rows: Vec<Vec<String>> },
}

impl Workbook {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfscopeError::FileNotFound(path.display().to_string()).into());
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let inner = match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => {
                Inner::Spreadsheet(open_workbook_auto(path)?)
            }
            "csv" => Inner::Delimited {
                name: file_stem(path),
                rows: read_delimited(path, b',')?,
            },
            "tsv" | "tab" => Inner::Delimited {
                name: file_stem(path),
                rows: read_delimited(path, b'\t')?,
            },
            other => {
                return Err(IngestError::UnsupportedFormat(format!(
                    "{} (extension '{other}')",
                    path.display()
                )));
            }
        };

        debug!(path = %path.display(), "opened workbook");
        Ok(Self { inner })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        match &self.inner {
            Inner::Spreadsheet(sheets) => sheets.sheet_names(),
            Inner::Delimited { name, .. } => vec![name.clone()],
        }
    }

    /// Load one sheet with its column names taken from `header_row`
    /// (zero-based). Rows above the header are ignored.
    pub fn table(&mut self, sheet: &str, header_row: usize) -> Result<Table> {
        let rows = match &mut self.inner {
            Inner::Spreadsheet(sheets) => {
                if !sheets.sheet_names().iter().any(|name| name == sheet) {
                    return Err(IngestError::SheetNotFound(sheet.to_string()));
                }
                range_rows(&sheets.worksheet_range(sheet)?)
            }
            Inner::Delimited { name, rows } => {
                if name.as_str() != sheet {
                    return Err(IngestError::SheetNotFound(sheet.to_string()));
                }
                rows.clone()
            }
        };
        Ok(Table::from_rows(sheet, rows, header_row))
    }
}

/// One sheet: trimmed header names plus data rows.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from raw rows. Blank rows below the header are dropped.
    pub fn from_rows(name: &str, rows: Vec<Vec<String>>, header_row: usize) -> Self {
        let mut rows = rows.into_iter().skip(header_row);
        let headers = rows
            .next()
            .map(|header| header.into_iter().map(|h| h.trim().to_string()).collect())
            .unwrap_or_default();
        let rows = rows
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .collect();

        Self {
            name: name.to_string(),
            headers,
            rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Position of the first of `aliases` present among the headers.
    pub fn column(&self, aliases: &[&str]) -> Option<usize> {
        aliases
            .iter()
            .find_map(|alias| self.headers.iter().position(|h| h == alias))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row {
            table: self,
            cells,
        })
    }
}

/// A data row viewed through its table's headers.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    cells: &'a [String],
}

impl<'a> Row<'a> {
    /// Trimmed value of the first alias column present; empty when the
    /// column is absent or the cell is blank.
    pub fn get(&self, aliases: &[&str]) -> &'a str {
        self.table
            .column(aliases)
            .and_then(|idx| self.cells.get(idx))
            .map(|cell| cell.trim())
            .unwrap_or("")
    }

    /// Like [`Row::get`], `None` for blank values.
    pub fn non_empty(&self, aliases: &[&str]) -> Option<&'a str> {
        Some(self.get(aliases)).filter(|value| !value.is_empty())
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| cell.trim().to_string()).collect());
    }
    Ok(rows)
}

/// Rows of a worksheet range addressed from the sheet's first row, so the
/// header position does not depend on where the used area starts.
fn range_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let leading = range
        .start()
        .map(|(row, _)| row as usize)
        .unwrap_or_default();

    std::iter::repeat_with(Vec::new)
        .take(leading)
        .chain(range.rows().map(|row| row.iter().map(cell_text).collect()))
        .collect()
}

/// Render a cell the way it reads in the sheet: integral floats without a
/// fraction, dates as `YYYY-MM-DD`, times of day as `HH:MM:SS`.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            match dt.as_datetime() {
                Some(value) if serial < 1.0 => value.format("%H:%M:%S").to_string(),
                Some(value) if serial.fract() == 0.0 => value.format("%Y-%m-%d").to_string(),
                Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => format_float(serial),
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_csv_table_uses_header_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "program.csv",
            "Form link: https://example.org,,\n Title ,Board  #,Hall\nGraph Parsing,12,A\n,,\nNeural MT,13,\n",
        );

        let mut workbook = Workbook::open(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["program".to_string()]);

        let table = workbook.table("program", 1).unwrap();
        assert_eq!(table.headers(), ["Title", "Board  #", "Hall"]);
        assert_eq!(table.len(), 2);

        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].get(&["Title"]), "Graph Parsing");
        assert_eq!(rows[0].get(&["Board #", "Board  #"]), "12");
        assert_eq!(rows[1].non_empty(&["Hall"]), None);
        assert_eq!(rows[1].get(&["Missing"]), "");
    }

    #[test]
    fn test_tsv_is_supported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "boards.tsv", "Title\tBoard\nGraph Parsing\t7\n");
        let mut workbook = Workbook::open(&path).unwrap();
        let table = workbook.table("boards", 0).unwrap();
        assert_eq!(table.rows().next().unwrap().get(&["Board"]), "7");
    }

    #[test]
    fn test_unknown_sheet_and_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "program.csv", "Title\nA\n");
        let mut workbook = Workbook::open(&path).unwrap();
        assert!(matches!(
            workbook.table("Other", 0),
            Err(IngestError::SheetNotFound(_))
        ));

        let odd = write_file(&dir, "program.txt", "Title\n");
        assert!(matches!(
            Workbook::open(&odd),
            Err(IngestError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Workbook::open(&dir.path().join("nope.xlsx"));
        assert!(matches!(
            result,
            Err(IngestError::Core(ConfscopeError::FileNotFound(_)))
        ));
    }

    #[test]
    fn test_header_row_past_end_gives_empty_table() {
        let table = Table::from_rows("s", vec![vec!["Title".to_string()]], 3);
        assert!(table.headers().is_empty());
        assert!(table.is_empty());
        assert!(!table.has_column("Title"));
    }

    #[test]
    fn test_cell_text_formats_numbers() {
        assert_eq!(cell_text(&Data::Float(123.0)), "123");
        assert_eq!(cell_text(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::String("  Oral 3A ".to_string())), "Oral 3A");
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::Bool(true)), "true");
    }
}
