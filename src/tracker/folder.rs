//! Dated destination folders and artifact moves.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use jiff::civil::Date;
use tracing::info;

use crate::{
    abbrev::{abbreviate_company, abbreviate_position},
    model::{ArtifactKind, ArtifactPair},
};

/// Directory under the base that holds all dated job folders.
pub const ARTIFACTS_DIR: &str = "resume and cover letters";

/// Where one job's files land: `<base>/resume and cover letters/<date>/<Company> - <Position>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub folder: PathBuf,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `<Company> - <Position>`.
    pub folder_name: String,
}

impl Destination {
    pub fn new(base_dir: &Path, company: &str, position: &str, date: Date) -> Self {
        let date = date.to_string();
        let folder_name = format!("{company} - {position}");
        let folder = base_dir.join(ARTIFACTS_DIR).join(&date).join(&folder_name);
        Self {
            folder,
            date,
            folder_name,
        }
    }

    /// Create the folder and move each existing artifact into it.
    ///
    /// Files are renamed to `<CoAbbr> - <PosAbbr> - R.pdf` / `- CL.pdf`.
    /// A missing source is skipped. Returns what was moved, with destinations.
    pub fn organize(
        &self,
        company: &str,
        position: &str,
        files: &ArtifactPair,
    ) -> io::Result<Vec<(ArtifactKind, PathBuf)>> {
        fs::create_dir_all(&self.folder)?;

        let prefix = format!(
            "{} - {}",
            abbreviate_company(company),
            abbreviate_position(position)
        );

        let mut moved = Vec::new();
        for kind in ArtifactKind::ALL {
            let Some(src) = files.get(kind).filter(|p| p.exists()) else {
                continue;
            };
            let dst = self.folder.join(format!("{prefix} - {}.pdf", kind.tag()));
            move_file(src, &dst)?;
            info!(from = %src.display(), to = %dst.display(), "organized {}", kind.tag());
            moved.push((kind, dst));
        }

        Ok(moved)
    }
}

/// Move a file, falling back to copy-then-remove across filesystems.
pub fn move_file(src: &Path, dst: &Path) -> io::Result<()> {
    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if fs::copy(src, dst).is_err() {
                return Err(rename_err);
            }
            fs::remove_file(src)
        }
    }
}

/// Human-readable pointer to a job folder, naming which artifacts it holds.
///
/// `See folder: 2026-01-27/Acme - Engineer/ (R, CL)`, or `(no files)`.
pub fn folder_reference(
    date: &str,
    folder_name: &str,
    kinds: impl IntoIterator<Item = ArtifactKind>,
) -> String {
    let tags: Vec<&str> = kinds.into_iter().map(ArtifactKind::tag).collect();
    let contents = if tags.is_empty() {
        "no files".to_string()
    } else {
        tags.join(", ")
    };
    format!("See folder: {date}/{folder_name}/ ({contents})")
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::civil::date;
    use tempfile::TempDir;

    #[test]
    fn destination_layout() {
        let dest = Destination::new(
            Path::new("/cvs"),
            "Acme Robotics Inc",
            "Engineer",
            date(2026, 1, 27),
        );

        assert_eq!(
            dest.folder,
            PathBuf::from("/cvs/resume and cover letters/2026-01-27/Acme Robotics Inc - Engineer")
        );
        assert_eq!(dest.date, "2026-01-27");
        assert_eq!(dest.folder_name, "Acme Robotics Inc - Engineer");
    }

    #[test]
    fn organize_moves_and_renames() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("0-R.pdf");
        fs::write(&src, b"resume").unwrap();

        let dest = Destination::new(dir.path(), "Google", "Data Scientist", date(2026, 1, 27));
        let files = ArtifactPair {
            resume: Some(src.clone()),
            cover_letter: Some(dir.path().join("missing-CL.pdf")),
        };

        let moved = dest.organize("Google", "Data Scientist", &files).unwrap();

        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].0, ArtifactKind::Resume);
        assert_eq!(moved[0].1, dest.folder.join("GOOG - DS - R.pdf"));
        assert_eq!(fs::read(&moved[0].1).unwrap(), b"resume");
        assert!(!src.exists());
    }

    #[test]
    fn organize_creates_folder_even_without_files() {
        let dir = TempDir::new().unwrap();
        let dest = Destination::new(dir.path(), "Acme", "Engineer", date(2026, 1, 27));

        let moved = dest
            .organize("Acme", "Engineer", &ArtifactPair::default())
            .unwrap();

        assert!(moved.is_empty());
        assert!(dest.folder.is_dir());
    }

    #[test]
    fn reference_lists_moved_kinds() {
        assert_eq!(
            folder_reference(
                "2026-01-27",
                "Acme - Engineer",
                [ArtifactKind::Resume, ArtifactKind::CoverLetter]
            ),
            "See folder: 2026-01-27/Acme - Engineer/ (R, CL)"
        );
        assert_eq!(
            folder_reference("2026-01-27", "Acme - Engineer", []),
            "See folder: 2026-01-27/Acme - Engineer/ (no files)"
        );
    }
}
