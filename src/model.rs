//! Core data model for jobtrack.
//!
//! These types represent the records that flow between the pipeline steps:
//! parsed job records, batch orders, generated artifacts, and the outcomes
//! reported back to the operator.

mod artifact;
mod job;
mod order;
mod outcome;

pub use artifact::{ArtifactKind, ArtifactPair};
pub use job::JobRecord;
pub use order::{BatchOrder, MatchedJob};
pub use outcome::{BatchReport, GenerationReceipt, JobReport, JobResult, ProcessOutcome};
