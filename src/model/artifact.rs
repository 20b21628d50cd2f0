//! Generated artifacts: the resume and cover letter produced for a job.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which of the two generated documents a file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactKind {
    Resume,
    CoverLetter,
}

impl ArtifactKind {
    pub const ALL: [Self; 2] = [Self::Resume, Self::CoverLetter];

    /// Short tag used in filenames: `R` or `CL`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Resume => "R",
            Self::CoverLetter => "CL",
        }
    }

    /// Environment variable that overrides discovery for one processor run.
    pub fn env_var(self) -> &'static str {
        match self {
            Self::Resume => "RESUME_FILE",
            Self::CoverLetter => "CL_FILE",
        }
    }
}

/// The resume and cover letter for one job.
///
/// Either side may be absent; absence is never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactPair {
    pub resume: Option<PathBuf>,
    pub cover_letter: Option<PathBuf>,
}

impl ArtifactPair {
    pub fn get(&self, kind: ArtifactKind) -> Option<&PathBuf> {
        match kind {
            ArtifactKind::Resume => self.resume.as_ref(),
            ArtifactKind::CoverLetter => self.cover_letter.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.resume.is_none() && self.cover_letter.is_none()
    }
}
