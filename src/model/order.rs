//! Batch orders: the checkpoint written when a batch is sent for generation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ArtifactPair, JobRecord};

/// A batch of jobs submitted together, persisted as `batch_order_<id>.json`.
///
/// Read once by the organizer, then archived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOrder {
    #[serde(default = "unknown_batch")]
    pub batch_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_jobs: Option<usize>,

    #[serde(default)]
    pub jobs: Vec<JobRecord>,
}

impl BatchOrder {
    /// Build an order from parsed jobs, assigning keys `0..n` and orders `1..n`.
    pub fn new(jobs: Vec<JobRecord>) -> Self {
        let jobs: Vec<JobRecord> = jobs
            .into_iter()
            .zip(0_u32..)
            .map(|(mut job, i)| {
                job.key = Some(i64::from(i));
                job.order = Some(i + 1);
                job
            })
            .collect();

        Self {
            batch_id: Uuid::new_v4().simple().to_string()[..8].to_string(),
            total_jobs: Some(jobs.len()),
            jobs,
        }
    }

    /// Number of jobs the batch promised, falling back to the job list length.
    pub fn expected_jobs(&self) -> usize {
        self.total_jobs.unwrap_or(self.jobs.len())
    }

    /// Whether any job carries an explicit key, selecting key-based matching.
    pub fn uses_keys(&self) -> bool {
        self.jobs.iter().any(|j| j.key.is_some())
    }

    /// The filename this order is written under.
    pub fn file_name(&self) -> String {
        format!("batch_order_{}.json", self.batch_id)
    }
}

/// A job from an order with its artifacts resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedJob {
    /// Present only when matched by key.
    pub key: Option<i64>,
    pub order: u32,
    pub job: JobRecord,
    pub files: ArtifactPair,
}

fn unknown_batch() -> String {
    "unknown".to_string()
}
