//! Single-job processing: file one job into the tracker.
//!
//! For one job this locates the tracking spreadsheet, backs it up, moves the
//! job's resume and cover letter into a dated folder, and appends a row that
//! links to that folder.
//!
//! ```text
//! <base>/
//!   job-applications.xlsx
//!   backups/job-applications_backup_<YYYY-MM-DD_HH-MM-SS>.xlsx
//!   resume and cover letters/<YYYY-MM-DD>/<Company> - <Position>/
//!     <CoAbbr> - <PosAbbr> - R.pdf
//!     <CoAbbr> - <PosAbbr> - CL.pdf
//! ```
//!
//! Moves and the spreadsheet write are not transactional: a failure after a
//! move leaves the file relocated with no row recorded.

mod folder;
mod workbook;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use ignore::WalkBuilder;
use jiff::Zoned;
use tracing::{info, warn};

pub use folder::{Destination, folder_reference, move_file};
pub use workbook::{TrackerRow, append_row, create_workbook};

use crate::{
    model::{ArtifactPair, JobRecord, ProcessOutcome},
    resolve::{self, Strategy},
};

/// Errors that can occur while processing a job.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("could not find {name} in {}", base_dir.display())]
    SpreadsheetNotFound { name: String, base_dir: PathBuf },

    #[error("spreadsheet has no sheets: {0}")]
    EmptyWorkbook(PathBuf),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = core::result::Result<T, ProcessError>;

/// Where a job is filed: the base directory and the tracker's filename.
#[derive(Debug, Clone)]
pub struct Tracker {
    pub base_dir: PathBuf,
    pub spreadsheet_name: String,
}

/// One job to file, with where to look for its artifacts.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub job: JobRecord,

    /// Explicit artifact paths that take precedence over discovery.
    pub hints: ArtifactPair,

    /// Directory searched for the newest `R-*.pdf` / `CL-*.pdf` when no hint is given.
    pub source_dir: PathBuf,
}

impl Tracker {
    pub fn new(base_dir: impl Into<PathBuf>, spreadsheet_name: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            spreadsheet_name: spreadsheet_name.into(),
        }
    }

    /// Locate the tracking spreadsheet under the base directory.
    ///
    /// Checks `<base>/<name>`, `<base>/job-applications/<name>`, and
    /// `<base>/Excel/<name>`, then searches the whole tree by exact filename.
    pub fn find_spreadsheet(&self) -> Result<PathBuf> {
        let name = &self.spreadsheet_name;
        let candidates = [
            self.base_dir.join(name),
            self.base_dir.join("job-applications").join(name),
            self.base_dir.join("Excel").join(name),
        ];

        if let Some(found) = candidates.into_iter().find(|p| p.is_file()) {
            return Ok(found);
        }

        WalkBuilder::new(&self.base_dir)
            .standard_filters(false)
            .sort_by_file_name(Ord::cmp)
            .build()
            .flatten()
            .find(|entry| {
                entry.file_type().is_some_and(|ft| ft.is_file())
                    && entry.file_name().to_string_lossy() == name.as_str()
            })
            .map(ignore::DirEntry::into_path)
            .ok_or_else(|| ProcessError::SpreadsheetNotFound {
                name: name.clone(),
                base_dir: self.base_dir.clone(),
            })
    }

    /// File one job: back up, move artifacts, append a row.
    ///
    /// `now` fixes the folder date, the row date, and the backup timestamp.
    pub fn process(&self, request: &JobRequest, now: &Zoned) -> Result<ProcessOutcome> {
        let spreadsheet = self.find_spreadsheet()?;
        info!(path = %spreadsheet.display(), "found tracking spreadsheet");

        let backup = backup_spreadsheet(&spreadsheet, now)?;

        let files = self.resolve_files(request);

        let job = &request.job;
        let date = now.date();
        let destination = Destination::new(&self.base_dir, &job.company, &job.position, date);
        let moved = destination.organize(&job.company, &job.position, &files)?;

        let reference = folder_reference(
            &destination.date,
            &destination.folder_name,
            moved.iter().map(|(kind, _)| *kind),
        );
        let folder = std::path::absolute(&destination.folder)?;

        let row = append_row(
            &spreadsheet,
            &TrackerRow {
                company: &job.company,
                position: &job.position,
                description: &job.description,
                date: &destination.date,
                link: &folder,
                label: &reference,
            },
        )?;
        info!(
            row,
            chars = job.description.chars().count(),
            "added {} - {} to tracker",
            job.company,
            job.position
        );

        Ok(ProcessOutcome {
            spreadsheet,
            backup,
            folder,
            folder_reference: reference,
            moved: moved.into_iter().map(|(_, path)| path).collect(),
            row,
        })
    }

    fn resolve_files(&self, request: &JobRequest) -> ArtifactPair {
        if request.hints.is_empty() && !request.source_dir.exists() {
            warn!(dir = %request.source_dir.display(), "source directory not found");
        }

        let files = resolve::resolve(&[
            Strategy::Override(&request.hints),
            Strategy::Latest(&request.source_dir),
        ]);

        if files.is_empty() {
            warn!(
                dir = %request.source_dir.display(),
                "no resume or cover letter found; continuing without files"
            );
        }
        files
    }
}

/// Copy the spreadsheet into `<dir>/backups/` before it is modified.
///
/// Returns `None` when there is nothing to back up yet.
pub fn backup_spreadsheet(path: &Path, now: &Zoned) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let backups = dir.join("backups");
    fs::create_dir_all(&backups)?;

    let stem = path
        .file_stem()
        .map_or_else(|| "job-applications".into(), |s| s.to_string_lossy());
    let timestamp = now.strftime("%Y-%m-%d_%H-%M-%S");
    let backup = backups.join(format!("{stem}_backup_{timestamp}.xlsx"));

    fs::copy(path, &backup)?;
    info!(path = %backup.display(), "created backup");
    Ok(Some(backup))
}
