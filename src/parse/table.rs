//! Spreadsheet input: header detection and row extraction.

use std::path::Path;

use crate::model::JobRecord;

use super::{ParseError, Result, UNKNOWN_COMPANY, UNKNOWN_POSITION};

/// A sheet reduced to a header row and string cells.
///
/// Empty cells are empty strings.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Read the first sheet of an `.xlsx` workbook.
    pub fn from_xlsx(path: &Path) -> Result<Self> {
        let book = umya_spreadsheet::reader::xlsx::read(path)
            .map_err(|e| ParseError::Spreadsheet(e.to_string()))?;
        let sheet = book.get_sheet(&0).ok_or(ParseError::EmptyWorkbook)?;

        let width = sheet.get_highest_column();
        let height = sheet.get_highest_row();

        let headers = (1..=width)
            .map(|col| sheet.get_value((col, 1_u32)))
            .collect();
        let rows = (2..=height)
            .map(|row| (1..=width).map(|col| sheet.get_value((col, row))).collect())
            .collect();

        Ok(Self { headers, rows })
    }

    /// Read a comma-separated file with a header row.
    pub fn from_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

        let headers = reader.headers()?.iter().map(String::from).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(String::from).collect());
        }

        Ok(Self { headers, rows })
    }
}

/// Indices of the columns jobs are read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Columns {
    pub description: Option<usize>,
    pub position: Option<usize>,
    pub company: Option<usize>,
    pub filter: Option<usize>,
}

impl Columns {
    /// Match headers against known aliases, case-insensitively.
    ///
    /// Each header is claimed by the first kind it matches, tried in the
    /// order description, position, company, filter. A later header of the
    /// same kind replaces an earlier one.
    pub fn detect(headers: &[String]) -> Self {
        let mut columns = Self::default();

        for (i, header) in headers.iter().enumerate() {
            let h = header.to_lowercase();
            if h.contains("full jd") || h.contains("job description") || h == "jd" {
                columns.description = Some(i);
            } else if h.contains("position") || h.contains("job title") || h.contains("title") {
                columns.position = Some(i);
            } else if h.contains("company") {
                columns.company = Some(i);
            } else if h.contains("filter") || h.contains("result") {
                columns.filter = Some(i);
            }
        }

        columns
    }
}

/// Extract job records from a table.
///
/// Requires a description and a position column. When a filter column
/// exists only rows marked exactly `PASS` are kept. Rows whose description
/// is blank are dropped.
pub fn jobs_from_table(table: &Table) -> Result<Vec<JobRecord>> {
    let columns = Columns::detect(&table.headers);

    let missing = |column| ParseError::MissingColumn {
        column,
        available: table.headers.clone(),
    };
    let description_col = columns.description.ok_or_else(|| missing("JD"))?;
    let position_col = columns.position.ok_or_else(|| missing("Position"))?;

    let jobs = table
        .rows
        .iter()
        .filter(|row| match columns.filter {
            Some(col) => row.get(col).is_some_and(|v| v == "PASS"),
            None => true,
        })
        .filter_map(|row| {
            let description = cell(row, Some(description_col))?;
            let company =
                cell(row, columns.company).unwrap_or_else(|| UNKNOWN_COMPANY.to_string());
            let position =
                cell(row, Some(position_col)).unwrap_or_else(|| UNKNOWN_POSITION.to_string());
            Some(JobRecord::new(company, position, description))
        })
        .collect();

    Ok(jobs)
}

/// A non-blank cell, or `None` for blank or missing cells.
fn cell(row: &[String], col: Option<usize>) -> Option<String> {
    row.get(col?)
        .filter(|value| !value.trim().is_empty())
        .cloned()
}
