//! Artifact discovery: find generated PDFs in a directory by naming convention.
//!
//! Two conventions are recognized:
//!
//! - keyed: `{key}-R.pdf` / `{key}-CL.pdf`, where `key` is an integer
//!   shared with a job in the batch order.
//! - stamped (legacy): `R-<timestamp>.pdf` / `CL-<timestamp>.pdf`.
//!
//! Directories that don't exist or can't be read yield nothing.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use crate::model::ArtifactKind;

/// A filename recognized as a generated artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactName {
    Keyed { key: i64, kind: ArtifactKind },
    Stamped { stamp: String, kind: ArtifactKind },
}

impl ArtifactName {
    /// Classify a filename, or `None` if it follows neither convention.
    pub fn parse(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(".pdf")?;

        for kind in ArtifactKind::ALL {
            let tag = kind.tag();

            if let Some(key) = stem.strip_suffix(&format!("-{tag}")) {
                if let Ok(key) = key.parse() {
                    return Some(Self::Keyed { key, kind });
                }
            }

            if let Some(stamp) = stem.strip_prefix(&format!("{tag}-")) {
                return Some(Self::Stamped {
                    stamp: stamp.to_string(),
                    kind,
                });
            }
        }

        None
    }

    pub fn kind(&self) -> ArtifactKind {
        match self {
            Self::Keyed { kind, .. } | Self::Stamped { kind, .. } => *kind,
        }
    }
}

/// Keyed artifacts by key, one map per kind.
#[derive(Debug, Clone, Default)]
pub struct KeyIndex {
    pub resumes: BTreeMap<i64, PathBuf>,
    pub cover_letters: BTreeMap<i64, PathBuf>,
}

impl KeyIndex {
    /// Scan a directory for `{key}-R.pdf` and `{key}-CL.pdf`.
    pub fn scan(dir: &Path) -> Self {
        let mut index = Self::default();
        for (path, name) in artifacts_in(dir) {
            if let ArtifactName::Keyed { key, kind } = name {
                index.map_mut(kind).insert(key, path);
            }
        }
        index
    }

    pub fn get(&self, kind: ArtifactKind, key: i64) -> Option<&PathBuf> {
        self.map(kind).get(&key)
    }

    pub fn map(&self, kind: ArtifactKind) -> &BTreeMap<i64, PathBuf> {
        match kind {
            ArtifactKind::Resume => &self.resumes,
            ArtifactKind::CoverLetter => &self.cover_letters,
        }
    }

    fn map_mut(&mut self, kind: ArtifactKind) -> &mut BTreeMap<i64, PathBuf> {
        match kind {
            ArtifactKind::Resume => &mut self.resumes,
            ArtifactKind::CoverLetter => &mut self.cover_letters,
        }
    }
}

/// Stamped artifacts, each kind sorted by the timestamp text in its filename.
///
/// Sorting is lexicographic on the text after the `R-` / `CL-` prefix;
/// file modification times play no part.
#[derive(Debug, Clone, Default)]
pub struct StampIndex {
    pub resumes: Vec<PathBuf>,
    pub cover_letters: Vec<PathBuf>,
}

impl StampIndex {
    /// Scan a directory for `R-*.pdf` and `CL-*.pdf`.
    pub fn scan(dir: &Path) -> Self {
        let mut resumes = Vec::new();
        let mut cover_letters = Vec::new();

        for (path, name) in artifacts_in(dir) {
            if let ArtifactName::Stamped { stamp, kind } = name {
                match kind {
                    ArtifactKind::Resume => resumes.push((stamp, path)),
                    ArtifactKind::CoverLetter => cover_letters.push((stamp, path)),
                }
            }
        }

        Self {
            resumes: sorted_by_stamp(resumes),
            cover_letters: sorted_by_stamp(cover_letters),
        }
    }

    pub fn list(&self, kind: ArtifactKind) -> &[PathBuf] {
        match kind {
            ArtifactKind::Resume => &self.resumes,
            ArtifactKind::CoverLetter => &self.cover_letters,
        }
    }
}

/// The most recently modified stamped artifact of one kind.
pub fn latest_stamped(dir: &Path, kind: ArtifactKind) -> Option<PathBuf> {
    artifacts_in(dir)
        .into_iter()
        .filter(|(_, name)| matches!(name, ArtifactName::Stamped { .. }) && name.kind() == kind)
        .filter_map(|(path, _)| {
            let modified = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
            Some((modified, path))
        })
        .max_by_key(|(modified, _): &(SystemTime, PathBuf)| *modified)
        .map(|(_, path)| path)
}

/// Count artifacts of each kind across both conventions: `(resumes, cover_letters)`.
pub fn count_artifacts(dir: &Path) -> (usize, usize) {
    artifacts_in(dir)
        .iter()
        .fold((0, 0), |(r, cl), (_, name)| match name.kind() {
            ArtifactKind::Resume => (r + 1, cl),
            ArtifactKind::CoverLetter => (r, cl + 1),
        })
}

/// List the recognized artifacts directly inside a directory, sorted by filename.
fn artifacts_in(dir: &Path) -> Vec<(PathBuf, ArtifactName)> {
    let Ok(read_dir) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut found: Vec<(PathBuf, ArtifactName)> = read_dir
        .filter_map(|entry| {
            let entry = entry.ok()?;
            if !entry.file_type().ok()?.is_file() {
                return None;
            }
            let name = ArtifactName::parse(&entry.file_name().to_string_lossy())?;
            Some((entry.path(), name))
        })
        .collect();

    // Sort for deterministic output.
    found.sort_by(|a, b| a.0.cmp(&b.0));
    found
}

fn sorted_by_stamp(mut files: Vec<(String, PathBuf)>) -> Vec<PathBuf> {
    files.sort_by(|a, b| a.0.cmp(&b.0));
    files.into_iter().map(|(_, path)| path).collect()
}
