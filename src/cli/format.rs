//! Output formatting for CLI display.

use std::fmt::Write;
use std::path::Path;

use crate::model::{ArtifactKind, BatchReport, JobResult, MatchedJob, ProcessOutcome};
use crate::organize::{BatchPlan, MatchMode};

/// Position text shown in the matching preview is cut to this many characters.
const PREVIEW_POSITION_CHARS: usize = 40;

/// The matching preview shown before confirmation.
pub(super) fn format_plan(plan: &BatchPlan) -> String {
    let mode = match plan.mode {
        MatchMode::Key => "key",
        MatchMode::Timestamp => "timestamp",
    };

    let mut out = format!(
        "Batch {} ({} jobs, matched by {mode})\n\
         Found {} resumes and {} cover letters\n\n",
        plan.order.batch_id,
        plan.order.expected_jobs(),
        plan.found_resumes,
        plan.found_cover_letters,
    );

    for job in &plan.jobs {
        out.push_str(&format_match(job));
    }
    out
}

fn format_match(matched: &MatchedJob) -> String {
    let position: String = matched
        .job
        .position
        .chars()
        .take(PREVIEW_POSITION_CHARS)
        .collect();
    let key = matched
        .key
        .map(|k| format!(" Key={k} |"))
        .unwrap_or_default();

    let mut out = format!(
        "[{}]{key} {} - {position}\n",
        matched.order, matched.job.company
    );
    for kind in ArtifactKind::ALL {
        let file = matched
            .files
            .get(kind)
            .map_or_else(|| "Missing".to_string(), |p| file_name(p));
        let _ = writeln!(out, "    {}: {file}", kind.tag());
    }
    out
}

/// The per-job report printed after a batch runs.
pub(super) fn format_report(report: &BatchReport) -> String {
    let mut out = format!(
        "\nBatch {}: {} organized, {} failed, {} expected\n",
        report.batch_id,
        report.succeeded(),
        report.failed(),
        report.total_jobs,
    );

    for job in &report.jobs {
        let name = format!("{} - {}", job.company, job.position);
        let _ = match &job.result {
            JobResult::Organized { outcome } => {
                writeln!(out, "  [{}] ok      {name} (row {})", job.order, outcome.row)
            }
            JobResult::Failed { exit_code, message } => {
                let code = exit_code.map(|c| format!(" exit {c}:")).unwrap_or_default();
                writeln!(out, "  [{}] failed  {name}:{code} {message}", job.order)
            }
        };
    }

    match &report.archived_to {
        Some(path) => {
            let _ = writeln!(out, "Order archived to {}", path.display());
        }
        None => out.push_str("Order file was not archived\n"),
    }
    out
}

/// Human-readable summary of one processed job.
pub(super) fn format_outcome(outcome: &ProcessOutcome) -> String {
    let mut out = format!(
        "Added row {} to {}\n{}\n",
        outcome.row,
        outcome.spreadsheet.display(),
        outcome.folder_reference,
    );
    if let Some(backup) = &outcome.backup {
        let _ = writeln!(out, "Backup: {}", backup.display());
    }
    for path in &outcome.moved {
        let _ = writeln!(out, "Moved: {}", path.display());
    }
    out
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
