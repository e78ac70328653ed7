//! Input loaders: anthology XML, assignment and poster spreadsheets.

pub mod anthology;
pub mod assignments;
pub mod posters;
pub mod spreadsheet;

pub use anthology::{load_anthology, parse_anthology};
pub use assignments::{ScheduleRow, load_assignments, load_schedule_rows, papers_from_assignments, schedule_rows};
pub use posters::{PosterEntry, PosterSheets, is_poster_sheet, load_poster_sheets, poster_entries};
pub use spreadsheet::{Row, Table, Workbook};
