//! Outcomes: structured results handed between pipeline steps and shown to the operator.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What the single-job processor did for one job.
///
/// Printed as JSON by `process --json`, which is how the organizer
/// learns the result of a subprocess run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessOutcome {
    pub spreadsheet: PathBuf,
    pub backup: Option<PathBuf>,
    pub folder: PathBuf,
    /// `See folder: <date>/<name>/ (R, CL)` or `(no files)`.
    pub folder_reference: String,
    /// Destination paths of the files that were moved.
    pub moved: Vec<PathBuf>,
    /// 1-based spreadsheet row the job was written to.
    pub row: u32,
}

/// The result of one job within a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReport {
    pub order: u32,
    pub company: String,
    pub position: String,
    pub result: JobResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum JobResult {
    Organized { outcome: ProcessOutcome },

    /// Captured failure: exit code (when a subprocess ran) and a message.
    Failed {
        exit_code: Option<i32>,
        message: String,
    },
}

impl JobReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.result, JobResult::Organized { .. })
    }
}

/// Aggregate result of organizing a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub batch_id: String,
    pub total_jobs: usize,
    pub jobs: Vec<JobReport>,
    /// Where the order file was moved after processing.
    pub archived_to: Option<PathBuf>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.jobs.iter().filter(|j| j.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.jobs.len() - self.succeeded()
    }
}

/// Structured hand-off from the generation step.
///
/// The generator prints this as its last non-empty stdout line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReceipt {
    pub order_file: PathBuf,
    pub job_count: usize,
}
