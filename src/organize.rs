//! Batch organizing: pair generated files with the jobs of a batch order
//! and file each job into the tracker.
//!
//! The newest pending order decides the matching mode. If any job carries
//! a key, files are matched by `{key}-R.pdf` / `{key}-CL.pdf`; otherwise
//! the legacy stamped files are paired with jobs by position after sorting
//! on the timestamp in their names.
//!
//! Legacy pairing trusts that generation finished in submission order.
//! Nothing ties a stamped file to a particular job, so an out-of-order
//! generator silently swaps files between jobs.

mod runner;

use std::path::{Path, PathBuf};

use tracing::{info, warn};

pub use runner::{InProcessRunner, JobRunner, SubprocessRunner};

use crate::{
    discover::{KeyIndex, StampIndex},
    model::{BatchOrder, BatchReport, JobReport, JobResult, MatchedJob},
    queue::{self, OrderQueue},
    resolve::{self, Strategy},
};

/// How files were paired with jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Key,
    Timestamp,
}

/// A loaded order with every job's files resolved, ready for confirmation.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub order_file: PathBuf,
    pub order: BatchOrder,
    pub mode: MatchMode,
    pub jobs: Vec<MatchedJob>,
    pub found_resumes: usize,
    pub found_cover_letters: usize,
}

impl BatchPlan {
    /// Load the newest pending order and match files against it.
    pub fn prepare(queue: &OrderQueue) -> queue::Result<Self> {
        let order_file = queue.latest()?;
        let order = queue.load(&order_file)?;
        Ok(Self::from_order(order_file, order, queue.dir()))
    }

    /// Match the jobs of an order against the artifacts in `dir`.
    pub fn from_order(order_file: PathBuf, order: BatchOrder, dir: &Path) -> Self {
        let (mode, jobs, found_resumes, found_cover_letters) = if order.uses_keys() {
            let index = KeyIndex::scan(dir);
            let jobs = match_by_key(&order, &index);
            (
                MatchMode::Key,
                jobs,
                index.resumes.len(),
                index.cover_letters.len(),
            )
        } else {
            let files = StampIndex::scan(dir);
            let jobs = match_by_position(&order, &files);
            (
                MatchMode::Timestamp,
                jobs,
                files.resumes.len(),
                files.cover_letters.len(),
            )
        };

        let plan = Self {
            order_file,
            order,
            mode,
            jobs,
            found_resumes,
            found_cover_letters,
        };

        if plan.has_shortfall() {
            warn!(
                expected = plan.order.expected_jobs(),
                resumes = plan.found_resumes,
                cover_letters = plan.found_cover_letters,
                "not enough files for all jobs; some jobs will have none assigned"
            );
        }

        plan
    }

    /// Whether fewer resumes or cover letters were found than jobs expected.
    pub fn has_shortfall(&self) -> bool {
        let expected = self.order.expected_jobs();
        self.found_resumes < expected || self.found_cover_letters < expected
    }

    /// Run every job, then archive the order file.
    ///
    /// A failing job is recorded and the rest still run.
    pub fn execute(self, queue: &OrderQueue, runner: &dyn JobRunner) -> BatchReport {
        let total_jobs = self.order.expected_jobs();

        let jobs: Vec<JobReport> = self
            .jobs
            .iter()
            .map(|matched| {
                let result = runner.run(matched);
                match &result {
                    JobResult::Organized { outcome } => {
                        info!(order = matched.order, row = outcome.row, "organized job");
                    }
                    JobResult::Failed { exit_code, message } => {
                        warn!(order = matched.order, ?exit_code, "job failed: {message}");
                    }
                }
                JobReport {
                    order: matched.order,
                    company: matched.job.company.clone(),
                    position: matched.job.position.clone(),
                    result,
                }
            })
            .collect();

        let archived_to = match queue.archive(&self.order_file) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(path = %self.order_file.display(), "failed to archive order file: {e}");
                None
            }
        };

        BatchReport {
            batch_id: self.order.batch_id,
            total_jobs,
            jobs,
            archived_to,
        }
    }
}

/// Pair each job with `{key}-R.pdf` / `{key}-CL.pdf`.
///
/// A job without a key uses `order - 1`; a job without an order uses its
/// 1-based position in the list.
pub fn match_by_key(order: &BatchOrder, index: &KeyIndex) -> Vec<MatchedJob> {
    order
        .jobs
        .iter()
        .zip(1_u32..)
        .map(|(job, position)| {
            let order = job.order.unwrap_or(position);
            let key = job.key.unwrap_or(i64::from(order) - 1);
            MatchedJob {
                key: Some(key),
                order,
                job: job.clone(),
                files: resolve::resolve(&[Strategy::Key { key, index }]),
            }
        })
        .collect()
}

/// Pair the i-th job with the i-th stamped file of each kind.
pub fn match_by_position(order: &BatchOrder, files: &StampIndex) -> Vec<MatchedJob> {
    order
        .jobs
        .iter()
        .enumerate()
        .zip(1_u32..)
        .map(|((index, job), position)| MatchedJob {
            key: None,
            order: job.order.unwrap_or(position),
            job: job.clone(),
            files: resolve::resolve(&[Strategy::Position { index, files }]),
        })
        .collect()
}

/// Whether a confirmation answer means go ahead.
///
/// Empty input and `y` (any case, surrounding whitespace ignored) proceed.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer.is_empty() || answer == "y"
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use jiff::Zoned;
    use tempfile::TempDir;

    use crate::{
        model::JobRecord,
        parse::{UNKNOWN_COMPANY, parse_text},
        tracker::{Tracker, create_workbook},
    };

    fn touch(dir: &Path, name: &str) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, b"%PDF").unwrap();
        path
    }

    fn keyed_order(keys: &[i64]) -> BatchOrder {
        let mut order = BatchOrder::new(
            keys.iter()
                .map(|k| JobRecord::new(format!("Co {k}"), "Engineer", "jd"))
                .collect(),
        );
        for (job, key) in order.jobs.iter_mut().zip(keys) {
            job.key = Some(*key);
        }
        order
    }

    fn legacy_order(count: u32) -> BatchOrder {
        BatchOrder {
            batch_id: "legacy".into(),
            total_jobs: Some(count as usize),
            jobs: (1..=count)
                .map(|i| {
                    let mut job = JobRecord::new(format!("Co {i}"), "Engineer", "jd");
                    job.order = Some(i);
                    job
                })
                .collect(),
        }
    }

    #[test]
    fn key_matching_leaves_missing_side_absent() {
        let dir = TempDir::new().unwrap();
        let r0 = touch(dir.path(), "0-R.pdf");
        let cl0 = touch(dir.path(), "0-CL.pdf");
        let r1 = touch(dir.path(), "1-R.pdf");

        let plan = BatchPlan::from_order(PathBuf::new(), keyed_order(&[0, 1]), dir.path());

        assert_eq!(plan.mode, MatchMode::Key);
        assert_eq!(plan.jobs[0].files.resume, Some(r0));
        assert_eq!(plan.jobs[0].files.cover_letter, Some(cl0));
        assert_eq!(plan.jobs[1].files.resume, Some(r1));
        assert_eq!(plan.jobs[1].files.cover_letter, None);
        assert!(plan.has_shortfall());
    }

    #[test]
    fn missing_key_falls_back_to_order_minus_one() {
        let dir = TempDir::new().unwrap();
        let r4 = touch(dir.path(), "4-R.pdf");

        let mut order = keyed_order(&[0, 0]);
        order.jobs[1].key = None;
        order.jobs[1].order = Some(5);

        let jobs = match_by_key(&order, &KeyIndex::scan(dir.path()));

        assert_eq!(jobs[1].key, Some(4));
        assert_eq!(jobs[1].files.resume, Some(r4));
    }

    #[test]
    fn legacy_matching_is_positional_by_filename_stamp() {
        let dir = TempDir::new().unwrap();
        // Created newest stamp first.
        let feb = touch(dir.path(), "R-2024-02-01.pdf");
        let jan = touch(dir.path(), "R-2024-01-01.pdf");
        let cl_jan = touch(dir.path(), "CL-2024-01-01.pdf");

        let plan = BatchPlan::from_order(PathBuf::new(), legacy_order(2), dir.path());

        assert_eq!(plan.mode, MatchMode::Timestamp);
        assert_eq!(plan.jobs[0].order, 1);
        assert_eq!(plan.jobs[0].files.resume, Some(jan));
        assert_eq!(plan.jobs[0].files.cover_letter, Some(cl_jan));
        assert_eq!(plan.jobs[1].files.resume, Some(feb));
        assert_eq!(plan.jobs[1].files.cover_letter, None);
        assert!(plan.jobs.iter().all(|j| j.key.is_none()));
    }

    #[test]
    fn no_shortfall_when_counts_cover_jobs() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "0-R.pdf");
        touch(dir.path(), "0-CL.pdf");

        let plan = BatchPlan::from_order(PathBuf::new(), keyed_order(&[0]), dir.path());
        assert!(!plan.has_shortfall());
    }

    #[test]
    fn confirmation_defaults_to_yes() {
        assert!(is_affirmative(""));
        assert!(is_affirmative("  \n"));
        assert!(is_affirmative("y"));
        assert!(is_affirmative("Y\n"));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative("yes"));
    }

    /// Runner that fails the first job and succeeds otherwise.
    struct FlakyRunner {
        inner: InProcessRunner,
    }

    impl JobRunner for FlakyRunner {
        fn run(&self, job: &MatchedJob) -> JobResult {
            if job.order == 1 {
                JobResult::Failed {
                    exit_code: Some(1),
                    message: "boom".into(),
                }
            } else {
                self.inner.run(job)
            }
        }
    }

    fn setup_tracker(root: &Path) -> Tracker {
        let cvs = root.join("cvs");
        fs::create_dir_all(&cvs).unwrap();
        create_workbook(&cvs.join("job-applications.xlsx")).unwrap();
        Tracker::new(cvs, "job-applications.xlsx")
    }

    #[test]
    fn one_failure_does_not_abort_the_batch() {
        let dir = TempDir::new().unwrap();
        let exp_lib = dir.path().join("exp_lib");
        let tracker = setup_tracker(dir.path());
        let queue = OrderQueue::new(&exp_lib);
        queue.write(&keyed_order(&[0, 1])).unwrap();
        touch(&exp_lib, "1-R.pdf");

        let plan = BatchPlan::prepare(&queue).unwrap();
        let runner = FlakyRunner {
            inner: InProcessRunner::new(tracker, &exp_lib),
        };
        let report = plan.execute(&queue, &runner);

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert!(report.archived_to.is_some());
    }

    #[test]
    fn prepare_without_order_file_fails() {
        let dir = TempDir::new().unwrap();
        let queue = OrderQueue::new(dir.path());

        let err = BatchPlan::prepare(&queue).unwrap_err();
        assert!(matches!(err, queue::OrganizeError::NoOrderFile(_)));
    }

    #[test]
    fn parse_then_organize_end_to_end() {
        let dir = TempDir::new().unwrap();
        let exp_lib = dir.path().join("exp_lib");
        let tracker = setup_tracker(dir.path());
        let sheet = tracker.find_spreadsheet().unwrap();

        let input = "COMPANY: Google\nPOSITION: Data Scientist (AI-ML)\nJD:\nModel things.\n---\n\
                     COMPANY: Acme Robotics Inc\nPOSITION: Software Engineer\nJD:\nBuild robots.";
        let jobs = parse_text(input, UNKNOWN_COMPANY);
        assert_eq!(jobs.len(), 2);

        let queue = OrderQueue::new(&exp_lib);
        let order_file = queue.write(&BatchOrder::new(jobs)).unwrap();
        for key in 0..2 {
            touch(&exp_lib, &format!("{key}-R.pdf"));
            touch(&exp_lib, &format!("{key}-CL.pdf"));
        }

        let plan = BatchPlan::prepare(&queue).unwrap();
        assert_eq!(plan.mode, MatchMode::Key);
        assert!(!plan.has_shortfall());

        let runner = InProcessRunner::new(tracker.clone(), &exp_lib);
        let report = plan.execute(&queue, &runner);

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 0);

        let today = Zoned::now().date().to_string();
        let dated = tracker
            .base_dir
            .join("resume and cover letters")
            .join(&today);
        let google = dated.join("Google - Data Scientist (AI-ML)");
        let acme = dated.join("Acme Robotics Inc - Software Engineer");
        assert!(google.join("GOOG - DS-AIML - R.pdf").exists());
        assert!(google.join("GOOG - DS-AIML - CL.pdf").exists());
        assert!(acme.join("ARI - SWE - R.pdf").exists());
        assert!(acme.join("ARI - SWE - CL.pdf").exists());

        let rows: Vec<u32> = report
            .jobs
            .iter()
            .filter_map(|j| match &j.result {
                JobResult::Organized { outcome } => Some(outcome.row),
                JobResult::Failed { .. } => None,
            })
            .collect();
        assert_eq!(rows, [2, 3]);

        let leftover_pdfs = fs::read_dir(&exp_lib)
            .unwrap()
            .flatten()
            .filter(|e| e.path().extension().is_some_and(|x| x == "pdf"))
            .count();
        assert_eq!(leftover_pdfs, 0);

        assert!(!order_file.exists());
        assert!(exp_lib.join("archive").join(order_file.file_name().unwrap()).exists());
        assert!(sheet.exists());
    }
}
