//! Job runners: how the organizer hands one matched job to the processor.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use jiff::Zoned;

use crate::{
    model::{ArtifactKind, JobResult, MatchedJob, ProcessOutcome},
    tracker::{JobRequest, Tracker},
};

/// Longest stderr excerpt kept in a failure message.
const STDERR_SNIPPET_CHARS: usize = 200;

/// Child processors only log warnings, so their stderr ends with the error.
const CHILD_LOG_FILTER: &str = "jobtrack=warn";

/// Files one matched job and reports what happened.
pub trait JobRunner {
    fn run(&self, job: &MatchedJob) -> JobResult;
}

/// Runs `jobtrack process --json` as a child process per job.
///
/// Resolved files are passed as `RESUME_FILE` / `CL_FILE`; an unresolved
/// side is removed from the child's environment so an inherited value
/// can't leak in.
#[derive(Debug, Clone)]
pub struct SubprocessRunner {
    pub program: PathBuf,
    pub config: Option<PathBuf>,
    pub base_dir: PathBuf,
    pub source_dir: PathBuf,
}

impl SubprocessRunner {
    /// Runner that re-invokes the current executable.
    pub fn current(
        config: Option<&Path>,
        base_dir: &Path,
        source_dir: &Path,
    ) -> std::io::Result<Self> {
        Ok(Self {
            program: std::env::current_exe()?,
            config: config.map(Path::to_path_buf),
            base_dir: base_dir.to_path_buf(),
            source_dir: source_dir.to_path_buf(),
        })
    }

    fn command(&self, job: &MatchedJob) -> Command {
        let mut cmd = Command::new(&self.program);
        if let Some(config) = &self.config {
            cmd.arg("--config").arg(config);
        }
        // Job text may start with `-`; everything after `--` is positional.
        cmd.args(["process", "--json", "--"])
            .arg(&self.base_dir)
            .arg(&job.job.company)
            .arg(&job.job.position)
            .arg(&job.job.description)
            .arg(&self.source_dir)
            .env("RUST_LOG", CHILD_LOG_FILTER);

        for kind in ArtifactKind::ALL {
            match job.files.get(kind) {
                Some(path) => cmd.env(kind.env_var(), path),
                None => cmd.env_remove(kind.env_var()),
            };
        }
        cmd
    }
}

impl JobRunner for SubprocessRunner {
    fn run(&self, job: &MatchedJob) -> JobResult {
        let output = match self.command(job).output() {
            Ok(output) => output,
            Err(e) => {
                return JobResult::Failed {
                    exit_code: None,
                    message: format!("failed to run {}: {e}", self.program.display()),
                };
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return JobResult::Failed {
                exit_code: output.status.code(),
                message: stderr_snippet(&stderr),
            };
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match serde_json::from_str::<ProcessOutcome>(stdout.trim()) {
            Ok(outcome) => JobResult::Organized { outcome },
            Err(e) => JobResult::Failed {
                exit_code: output.status.code(),
                message: format!("unreadable processor output: {e}"),
            },
        }
    }
}

/// The part of a failed child's stderr that explains the failure.
///
/// `main` prints the error as the final line, after any log output, so
/// the last non-empty line is kept.
fn stderr_snippet(stderr: &str) -> String {
    stderr
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .unwrap_or_default()
        .chars()
        .take(STDERR_SNIPPET_CHARS)
        .collect()
}

/// Processes jobs in this process against a tracker.
#[derive(Debug, Clone)]
pub struct InProcessRunner {
    tracker: Tracker,
    source_dir: PathBuf,
}

impl InProcessRunner {
    pub fn new(tracker: Tracker, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            tracker,
            source_dir: source_dir.into(),
        }
    }
}

impl JobRunner for InProcessRunner {
    fn run(&self, job: &MatchedJob) -> JobResult {
        let request = JobRequest {
            job: job.job.clone(),
            hints: job.files.clone(),
            source_dir: self.source_dir.clone(),
        };
        match self.tracker.process(&request, &Zoned::now()) {
            Ok(outcome) => JobResult::Organized { outcome },
            Err(e) => JobResult::Failed {
                exit_code: None,
                message: e.to_string(),
            },
        }
    }
}
