//! The tracking spreadsheet: header setup and append-only rows.

use std::path::Path;

use umya_spreadsheet::{
    Spreadsheet, Worksheet,
    structs::{HorizontalAlignmentValues, Hyperlink, VerticalAlignmentValues},
};

use super::{ProcessError, Result};

/// Header text and column width for each tracker column, in order.
const COLUMNS: [(&str, &str, f64); 5] = [
    ("A", "Company", 20.0),
    ("B", "Position", 30.0),
    ("C", "Job Description", 60.0),
    ("D", "Application Date", 15.0),
    ("E", "Files", 15.0),
];

const LINK_COLOR: &str = "FF0563C1";

/// First data row; row 1 holds the header.
const FIRST_DATA_ROW: u32 = 2;

/// One tracker row.
#[derive(Debug, Clone, Copy)]
pub struct TrackerRow<'a> {
    pub company: &'a str,
    pub position: &'a str,
    /// Written exactly as given.
    pub description: &'a str,
    pub date: &'a str,
    /// Folder the Files cell links to.
    pub link: &'a Path,
    /// Text shown in the Files cell.
    pub label: &'a str,
}

/// Write an empty workbook to `path`.
pub fn create_workbook(path: &Path) -> Result<()> {
    let book = umya_spreadsheet::new_file();
    save(&book, path)
}

/// Append a row to the first sheet and save. Returns the 1-based row written.
///
/// Writes the header first if cell A1 is empty. The row is the first at or
/// after row 2 whose first cell is empty, so existing rows are never
/// overwritten.
pub fn append_row(path: &Path, row: &TrackerRow<'_>) -> Result<u32> {
    let mut book = umya_spreadsheet::reader::xlsx::read(path)
        .map_err(|e| ProcessError::Spreadsheet(format!("{}: {e}", path.display())))?;

    let sheet = book
        .get_sheet_mut(&0)
        .ok_or_else(|| ProcessError::EmptyWorkbook(path.to_path_buf()))?;

    if sheet.get_value((1_u32, 1_u32)).is_empty() {
        write_header(sheet);
    }

    let index = next_empty_row(sheet);
    let values = [row.company, row.position, row.description, row.date, row.label];
    for (col, value) in (1_u32..).zip(values) {
        sheet.get_cell_mut((col, index)).set_value_string(value);
        let alignment = sheet.get_style_mut((col, index)).get_alignment_mut();
        alignment.set_wrap_text(true);
        alignment.set_vertical(VerticalAlignmentValues::Top);
    }

    let mut link = Hyperlink::default();
    link.set_url(row.link.display().to_string());
    sheet.get_cell_mut((5_u32, index)).set_hyperlink(link);
    let font = sheet.get_style_mut((5_u32, index)).get_font_mut();
    font.get_color_mut().set_argb(LINK_COLOR);
    font.set_underline("single");

    save(&book, path)?;
    Ok(index)
}

fn write_header(sheet: &mut Worksheet) {
    for ((column, header, width), col) in COLUMNS.into_iter().zip(1_u32..) {
        sheet.get_cell_mut((col, 1_u32)).set_value_string(header);
        let alignment = sheet.get_style_mut((col, 1_u32)).get_alignment_mut();
        alignment.set_wrap_text(true);
        alignment.set_vertical(VerticalAlignmentValues::Top);
        alignment.set_horizontal(HorizontalAlignmentValues::Center);
        sheet.get_column_dimension_mut(column).set_width(width);
    }
}

fn next_empty_row(sheet: &Worksheet) -> u32 {
    let mut row = FIRST_DATA_ROW;
    while !sheet.get_value((1_u32, row)).is_empty() {
        row += 1;
    }
    row
}

fn save(book: &Spreadsheet, path: &Path) -> Result<()> {
    umya_spreadsheet::writer::xlsx::write(book, path)
        .map_err(|e| ProcessError::Spreadsheet(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn sample_row<'a>(company: &'a str, description: &'a str) -> TrackerRow<'a> {
        TrackerRow {
            company,
            position: "Engineer",
            description,
            date: "2026-01-27",
            link: Path::new("/cvs/resume and cover letters/2026-01-27/Acme - Engineer"),
            label: "See folder: 2026-01-27/Acme - Engineer/ (R, CL)",
        }
    }

    fn read_sheet(path: &Path) -> Spreadsheet {
        umya_spreadsheet::reader::xlsx::read(path).unwrap()
    }

    fn row_labels(path: &Path) -> Result<Vec<String>> {
        let book = umya_spreadsheet::reader::xlsx::read(path)
            .map_err(|e| ProcessError::Spreadsheet(format!("{}: {e}", path.display())))?;
        let sheet = book
            .get_sheet(&0)
            .ok_or_else(|| ProcessError::EmptyWorkbook(path.to_path_buf()))?;

        let last = next_empty_row(sheet);
        Ok((FIRST_DATA_ROW..last)
            .map(|row| sheet.get_value((1_u32, row)))
            .collect())
    }

    #[test]
    fn first_append_writes_header_and_row_two() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job-applications.xlsx");
        create_workbook(&path).unwrap();

        let row = append_row(&path, &sample_row("Acme", "Build rockets.")).unwrap();
        assert_eq!(row, 2);

        let book = read_sheet(&path);
        let sheet = book.get_sheet(&0).unwrap();
        let header: Vec<String> = (1_u32..=5).map(|c| sheet.get_value((c, 1_u32))).collect();
        assert_eq!(
            header,
            ["Company", "Position", "Job Description", "Application Date", "Files"]
        );
        assert_eq!(sheet.get_value((1_u32, 2_u32)), "Acme");
        assert_eq!(sheet.get_value((4_u32, 2_u32)), "2026-01-27");
        assert_eq!(
            sheet.get_value((5_u32, 2_u32)),
            "See folder: 2026-01-27/Acme - Engineer/ (R, CL)"
        );
    }

    #[test]
    fn header_is_wrapped_top_and_centred() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job-applications.xlsx");
        create_workbook(&path).unwrap();
        append_row(&path, &sample_row("Acme", "text")).unwrap();

        let book = read_sheet(&path);
        let sheet = book.get_sheet(&0).unwrap();
        for col in 1_u32..=5 {
            let alignment = sheet
                .get_style((col, 1_u32))
                .get_alignment()
                .expect("header cell has an alignment");
            assert!(alignment.get_wrap_text().to_owned());
            assert!(matches!(
                alignment.get_vertical(),
                VerticalAlignmentValues::Top
            ));
            assert!(matches!(
                alignment.get_horizontal(),
                HorizontalAlignmentValues::Center
            ));
        }
    }

    #[test]
    fn consecutive_appends_never_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job-applications.xlsx");
        create_workbook(&path).unwrap();

        let first = append_row(&path, &sample_row("Acme", "one")).unwrap();
        let second = append_row(&path, &sample_row("Initech", "two")).unwrap();

        assert!(second > first);
        assert_eq!(row_labels(&path).unwrap(), ["Acme", "Initech"]);
    }

    #[test]
    fn description_is_stored_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job-applications.xlsx");
        create_workbook(&path).unwrap();

        let description = format!(
            "Responsibilities:\n- ship\n- {}\n\nTotal comp: 12345",
            "x".repeat(5_000)
        );
        append_row(&path, &sample_row("Acme", &description)).unwrap();

        let book = read_sheet(&path);
        let sheet = book.get_sheet(&0).unwrap();
        assert_eq!(sheet.get_value((3_u32, 2_u32)), description);
    }

    #[test]
    fn append_fills_first_gap_after_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job-applications.xlsx");

        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_mut(&0).unwrap();
        sheet.get_cell_mut((1_u32, 1_u32)).set_value_string("Company");
        sheet.get_cell_mut((1_u32, 2_u32)).set_value_string("Existing");
        sheet.get_cell_mut((1_u32, 4_u32)).set_value_string("Later");
        save(&book, &path).unwrap();

        let row = append_row(&path, &sample_row("New", "text")).unwrap();

        assert_eq!(row, 3);
        let book = read_sheet(&path);
        let sheet = book.get_sheet(&0).unwrap();
        assert_eq!(sheet.get_value((1_u32, 4_u32)), "Later");
        assert_eq!(sheet.get_value((2_u32, 1_u32)), "");
    }

    #[test]
    fn unreadable_workbook_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job-applications.xlsx");
        std::fs::write(&path, b"not a zip").unwrap();

        let err = append_row(&path, &sample_row("Acme", "text")).unwrap_err();
        assert!(matches!(err, ProcessError::Spreadsheet(_)));
    }
}
