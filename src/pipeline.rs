//! The orchestrator: send a batch for generation, wait for files, organize.
//!
//! ```text
//! input file ──► generator (or enqueue) ──► GenerationReceipt
//!                                                │
//!             poll exp_lib until counts match ◄──┘
//!                         │
//!                         ▼
//!              jobtrack organize --yes
//! ```
//!
//! Every step blocks. A wait timeout is logged and the organizer still runs
//! on whatever files arrived.

use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use tracing::{info, warn};

use crate::{
    config::Config,
    discover::count_artifacts,
    model::{BatchOrder, GenerationReceipt},
    parse::{self, ParseError},
    queue::{OrderQueue, OrganizeError},
};

/// Errors that can occur while orchestrating a batch.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Queue(#[from] OrganizeError),

    #[error("no jobs found in {}", .0.display())]
    NoJobs(PathBuf),

    #[error("generator failed: {0}")]
    Generator(String),

    #[error("could not read generation receipt: {0}")]
    Receipt(String),

    #[error("organizer failed: {0}")]
    Organizer(String),
}

pub type Result<T> = core::result::Result<T, PipelineError>;

/// How the wait for generated files ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Ready { resumes: usize, cover_letters: usize },
    TimedOut { resumes: usize, cover_letters: usize },
}

/// Parse an input file and write its batch order into `exp_lib_dir`.
///
/// Jobs get keys `0..n` and orders `1..n`, so the generator can name its
/// output `{key}-R.pdf` / `{key}-CL.pdf`.
pub fn enqueue(input: &Path, company: &str, exp_lib_dir: &Path) -> Result<GenerationReceipt> {
    let jobs = parse::parse_file(input, company)?;
    if jobs.is_empty() {
        return Err(PipelineError::NoJobs(input.to_path_buf()));
    }

    let order = BatchOrder::new(jobs);
    let order_file = OrderQueue::new(exp_lib_dir).write(&order)?;
    info!(path = %order_file.display(), jobs = order.jobs.len(), "wrote batch order");

    Ok(GenerationReceipt {
        order_file,
        job_count: order.jobs.len(),
    })
}

/// Run the configured generator on the input file and read its receipt.
///
/// The input path and company are appended to the configured command.
/// The generator's stderr passes through to the terminal.
pub fn generate(generator: &[String], input: &Path, company: &str) -> Result<GenerationReceipt> {
    let (program, leading) = generator
        .split_first()
        .ok_or_else(|| PipelineError::Generator("no generator configured".to_string()))?;

    info!(program, "sending batch for generation");
    let output = Command::new(program)
        .args(leading)
        .arg(input)
        .arg(company)
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| PipelineError::Generator(format!("failed to run {program}: {e}")))?;

    if !output.status.success() {
        return Err(PipelineError::Generator(format!(
            "{program} exited with status {}",
            output.status.code().unwrap_or(-1)
        )));
    }

    parse_receipt(&String::from_utf8_lossy(&output.stdout))
}

/// Read the receipt from the last non-empty line of generator output.
pub fn parse_receipt(stdout: &str) -> Result<GenerationReceipt> {
    let line = stdout
        .lines()
        .map(str::trim)
        .rfind(|l| !l.is_empty())
        .ok_or_else(|| PipelineError::Receipt("generator printed nothing".to_string()))?;

    serde_json::from_str(line).map_err(|e| PipelineError::Receipt(format!("{e}: {line}")))
}

/// Poll `dir` until it holds `expected` resumes and cover letters.
///
/// Gives up after `expected × per_job`. Both naming conventions count.
pub fn wait_for_files(
    dir: &Path,
    expected: usize,
    per_job: Duration,
    interval: Duration,
) -> WaitOutcome {
    let budget = per_job.saturating_mul(u32::try_from(expected).unwrap_or(u32::MAX));
    let started = Instant::now();

    info!(
        dir = %dir.display(),
        expected,
        timeout_secs = budget.as_secs(),
        "waiting for generated files"
    );

    loop {
        let (resumes, cover_letters) = count_artifacts(dir);
        if resumes >= expected && cover_letters >= expected {
            info!(resumes, cover_letters, "all files present");
            return WaitOutcome::Ready {
                resumes,
                cover_letters,
            };
        }

        let elapsed = started.elapsed();
        if elapsed >= budget {
            warn!(
                resumes,
                cover_letters,
                expected,
                "timed out waiting for files; continuing with what exists"
            );
            return WaitOutcome::TimedOut {
                resumes,
                cover_letters,
            };
        }

        info!(resumes, cover_letters, expected, "still waiting");
        thread::sleep(interval.min(budget - elapsed));
    }
}

/// Run `jobtrack organize --yes` as a child process with inherited output.
pub fn organize(config_path: Option<&Path>, config: &Config) -> Result<()> {
    let program = std::env::current_exe()
        .map_err(|e| PipelineError::Organizer(format!("could not locate executable: {e}")))?;

    let mut cmd = Command::new(&program);
    if let Some(path) = config_path {
        cmd.arg("--config").arg(path);
    }
    let status = cmd
        .args(["organize", "--yes", "--"])
        .arg(&config.exp_lib_dir)
        .arg(&config.cvs_dir)
        .status()
        .map_err(|e| PipelineError::Organizer(format!("failed to run organizer: {e}")))?;

    if status.success() {
        Ok(())
    } else {
        Err(PipelineError::Organizer(format!(
            "exited with status {}",
            status.code().unwrap_or(-1)
        )))
    }
}
