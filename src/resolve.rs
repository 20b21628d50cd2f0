//! Artifact resolution: decide which files belong to a job.
//!
//! Resolution runs an ordered list of strategies. Each strategy either
//! declines (it doesn't apply) or decides the whole pair, possibly with
//! one or both sides absent. The first strategy that decides wins, so a
//! later heuristic can never fill in a side an earlier one left empty.
//!
//! Precedence, highest first:
//!
//! 1. explicit override paths (the `RESUME_FILE` / `CL_FILE` hints)
//! 2. key lookup against `{key}-R.pdf` / `{key}-CL.pdf`
//! 3. position in the timestamp-sorted `R-*.pdf` / `CL-*.pdf` lists
//! 4. the most recently modified `R-*.pdf` / `CL-*.pdf`

use std::path::{Path, PathBuf};

use crate::{
    discover::{self, KeyIndex, StampIndex},
    model::{ArtifactKind, ArtifactPair},
};

/// One way of finding a job's artifacts.
#[derive(Debug, Clone)]
pub enum Strategy<'a> {
    /// Explicit paths. Applies when either hint is given; a hint that
    /// doesn't exist on disk resolves to absent.
    Override(&'a ArtifactPair),

    /// Look the key up in a keyed index.
    Key { key: i64, index: &'a KeyIndex },

    /// Take the n-th file of each kind from a stamp-sorted index.
    Position { index: usize, files: &'a StampIndex },

    /// Take the newest stamped file of each kind in a directory.
    Latest(&'a Path),
}

impl Strategy<'_> {
    /// Decide the pair, or `None` if this strategy doesn't apply.
    pub fn attempt(&self) -> Option<ArtifactPair> {
        match self {
            Self::Override(hints) => {
                if hints.is_empty() {
                    return None;
                }
                Some(ArtifactPair {
                    resume: existing(hints.resume.as_deref()),
                    cover_letter: existing(hints.cover_letter.as_deref()),
                })
            }
            Self::Key { key, index } => Some(pair_from(|kind| index.get(kind, *key).cloned())),
            Self::Position { index, files } => {
                Some(pair_from(|kind| files.list(kind).get(*index).cloned()))
            }
            Self::Latest(dir) => Some(pair_from(|kind| discover::latest_stamped(dir, kind))),
        }
    }
}

/// Run strategies in order; the first that applies decides.
///
/// Returns an empty pair when none apply.
pub fn resolve(strategies: &[Strategy<'_>]) -> ArtifactPair {
    strategies
        .iter()
        .find_map(Strategy::attempt)
        .unwrap_or_default()
}

fn pair_from(mut lookup: impl FnMut(ArtifactKind) -> Option<PathBuf>) -> ArtifactPair {
    ArtifactPair {
        resume: lookup(ArtifactKind::Resume),
        cover_letter: lookup(ArtifactKind::CoverLetter),
    }
}

fn existing(path: Option<&Path>) -> Option<PathBuf> {
    path.filter(|p| p.exists()).map(Path::to_path_buf)
}
