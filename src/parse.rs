//! Input parsing: turn a spreadsheet or text file into job records.
//!
//! Spreadsheets (`.xlsx`, `.xls`, `.csv`) are read as a header row plus data
//! rows and mapped through column detection. Anything else is treated as a
//! text file of `COMPANY:` / `POSITION:` / `JD:` sections.

mod table;
mod text;

use std::{io, path::Path};

pub use table::{Table, jobs_from_table};
pub use text::parse_text;

use crate::model::JobRecord;

/// Company used when a row or section does not name one.
pub const UNKNOWN_COMPANY: &str = "Unknown Company";

/// Position used when a spreadsheet row leaves it blank.
pub const UNKNOWN_POSITION: &str = "Unknown Position";

/// Errors that can occur while parsing input.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("no {column} column found. Available: {}", available.join(", "))]
    MissingColumn {
        column: &'static str,
        available: Vec<String>,
    },

    #[error("spreadsheet has no sheets")]
    EmptyWorkbook,

    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = core::result::Result<T, ParseError>;

/// Parse jobs from a file, dispatching on its extension.
///
/// `default_company` applies to text sections without a `COMPANY:` line.
pub fn parse_file(path: &Path, default_company: &str) -> Result<Vec<JobRecord>> {
    if !path.exists() {
        return Err(ParseError::FileNotFound(path.display().to_string()));
    }

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xls" => jobs_from_table(&Table::from_xlsx(path)?),
        "csv" => jobs_from_table(&Table::from_csv(path)?),
        _ => {
            let content = std::fs::read_to_string(path)?;
            Ok(parse_text(&content, default_company))
        }
    }
}
