//! CLI interface for jobtrack.
//!
//! Each pipeline step is its own subcommand so it can run alone or be
//! driven by `run`:
//!
//! - `jobtrack parse` prints job records as JSON.
//! - `jobtrack enqueue` writes a batch order for the generator.
//! - `jobtrack organize` files generated PDFs for the newest batch order.
//! - `jobtrack process` files one job.
//! - `jobtrack run` does all of it for an input file.
//!
//! Directories given on the command line override the config file.

mod format;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use jiff::Zoned;

use crate::config::Config;
use crate::model::{ArtifactKind, ArtifactPair, JobRecord};
use crate::organize::{self, BatchPlan, InProcessRunner, JobRunner, SubprocessRunner};
use crate::parse::{self, UNKNOWN_COMPANY};
use crate::pipeline::{self, WaitOutcome};
use crate::queue::OrderQueue;
use crate::tracker::{JobRequest, Tracker, create_workbook};

use format::{format_outcome, format_plan, format_report};

/// jobtrack: file generated resumes and cover letters into a job tracker.
#[derive(Debug, Parser)]
#[command(name = "jobtrack", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Config file (default: `~/.jobtrack/config.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: one batch
  1. jobtrack run jobs.xlsx
     → writes batch_order_<id>.json (or runs the configured generator)
     → waits for {key}-R.pdf / {key}-CL.pdf in exp_lib
     → organizes them into cvs/resume and cover letters/<date>/

Step by step:
  jobtrack parse jobs.txt "Acme"
  jobtrack enqueue jobs.txt "Acme"
  jobtrack organize exp_lib cvs
  RESUME_FILE=r.pdf jobtrack process cvs Acme Engineer "Full JD text""#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a spreadsheet or text file into job records.
    ///
    /// Prints a JSON array of `{company, position, jd}` to stdout.
    Parse {
        /// `.xlsx`, `.xls`, `.csv`, or a text file of `---`-separated sections.
        file: PathBuf,

        /// Company for text sections without a `COMPANY:` line.
        default_company: Option<String>,
    },

    /// Write a batch order for an input file and print the receipt JSON.
    Enqueue {
        input_file: PathBuf,

        /// Company for text sections without a `COMPANY:` line.
        company: Option<String>,

        /// Where to write the order (default: `exp-lib-dir` from config).
        exp_lib_dir: Option<PathBuf>,
    },

    /// Match generated files to the newest batch order and file every job.
    ///
    /// Shows the matching and asks before moving anything.
    /// Always exits 0; per-job failures are listed in the report.
    Organize {
        /// Directory holding generated PDFs and batch orders.
        exp_lib_dir: Option<PathBuf>,

        /// Base directory holding the tracking spreadsheet.
        cvs_dir: Option<PathBuf>,

        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// File one job: move its files and append a tracker row.
    ///
    /// `RESUME_FILE` and `CL_FILE` override discovery of the newest
    /// `R-*.pdf` / `CL-*.pdf` in the source directory.
    Process {
        base_dir: PathBuf,
        company: String,
        position: String,

        /// Full job description, stored verbatim.
        jd_text: String,

        /// Directory searched for generated files (default: `exp-lib-dir` from config).
        exp_lib_dir: Option<PathBuf>,

        /// Print the outcome as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Send a batch for generation, wait for the files, and organize them.
    Run {
        input_file: PathBuf,

        /// Company for text sections without a `COMPANY:` line.
        company: Option<String>,

        /// Seconds to wait per job for generated files.
        #[arg(long)]
        wait_per_job: Option<u64>,
    },

    /// Create an empty tracking spreadsheet.
    Init {
        /// Where to create it (default: `cvs-dir` from config).
        base_dir: Option<PathBuf>,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run() -> Result<(), String> {
    dispatch(Cli::parse())
}

fn dispatch(cli: Cli) -> Result<(), String> {
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        // The organizer reports problems but always exits 0.
        Err(e) if matches!(cli.command, Command::Organize { .. }) => {
            eprintln!("Error: {e}");
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Parse {
            file,
            default_company,
        } => cmd_parse(&file, default_company.as_deref()),
        Command::Enqueue {
            input_file,
            company,
            exp_lib_dir,
        } => cmd_enqueue(
            &input_file,
            company.as_deref(),
            exp_lib_dir.as_deref().unwrap_or(&config.exp_lib_dir),
        ),
        Command::Organize {
            exp_lib_dir,
            cvs_dir,
            yes,
        } => {
            cmd_organize(
                config_path,
                &config,
                exp_lib_dir.as_deref().unwrap_or(&config.exp_lib_dir),
                cvs_dir.as_deref().unwrap_or(&config.cvs_dir),
                yes,
            );
            Ok(())
        }
        Command::Process {
            base_dir,
            company,
            position,
            jd_text,
            exp_lib_dir,
            json,
        } => cmd_process(
            &config,
            &base_dir,
            JobRecord::new(company, &position, jd_text),
            exp_lib_dir.as_deref().unwrap_or(&config.exp_lib_dir),
            json,
        ),
        Command::Run {
            input_file,
            company,
            wait_per_job,
        } => cmd_run(
            config_path,
            &config,
            &input_file,
            company.as_deref(),
            wait_per_job,
        ),
        Command::Init { base_dir } => {
            cmd_init(&config, base_dir.as_deref().unwrap_or(&config.cvs_dir))
        }
    }
}

fn cmd_parse(file: &Path, default_company: Option<&str>) -> Result<(), String> {
    let jobs = parse::parse_file(file, default_company.unwrap_or(UNKNOWN_COMPANY))
        .map_err(|e| e.to_string())?;

    let json = serde_json::to_string_pretty(&jobs)
        .map_err(|e| format!("failed to serialize jobs: {e}"))?;
    println!("{json}");
    Ok(())
}

fn cmd_enqueue(input: &Path, company: Option<&str>, exp_lib_dir: &Path) -> Result<(), String> {
    let receipt = pipeline::enqueue(input, company.unwrap_or(UNKNOWN_COMPANY), exp_lib_dir)
        .map_err(|e| e.to_string())?;

    let json = serde_json::to_string(&receipt)
        .map_err(|e| format!("failed to serialize receipt: {e}"))?;
    println!("{json}");
    Ok(())
}

/// Organize the newest batch. Problems are printed, never returned.
fn cmd_organize(
    config_path: Option<&Path>,
    config: &Config,
    exp_lib_dir: &Path,
    cvs_dir: &Path,
    yes: bool,
) {
    let queue = OrderQueue::new(exp_lib_dir);
    let plan = match BatchPlan::prepare(&queue) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("Error: {e}");
            return;
        }
    };

    print!("{}", format_plan(&plan));

    if !yes {
        match confirm(&format!(
            "Proceed with organizing {} jobs? [Y/n] ",
            plan.jobs.len()
        )) {
            Ok(true) => {}
            Ok(false) => {
                println!("Cancelled");
                return;
            }
            Err(e) => {
                eprintln!("Error: failed to read confirmation: {e}");
                return;
            }
        }
    }

    let runner: Box<dyn JobRunner> =
        match SubprocessRunner::current(config_path, cvs_dir, exp_lib_dir) {
            Ok(runner) => Box::new(runner),
            Err(e) => {
                tracing::warn!("cannot re-invoke jobtrack ({e}); processing in this process");
                let tracker = Tracker::new(cvs_dir, &config.spreadsheet_name);
                Box::new(InProcessRunner::new(tracker, exp_lib_dir))
            }
        };

    let report = plan.execute(&queue, runner.as_ref());
    print!("{}", format_report(&report));
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(organize::is_affirmative(&answer))
}

fn cmd_process(
    config: &Config,
    base_dir: &Path,
    job: JobRecord,
    source_dir: &Path,
    json: bool,
) -> Result<(), String> {
    let tracker = Tracker::new(base_dir, &config.spreadsheet_name);
    let request = JobRequest {
        job,
        hints: env_hints(),
        source_dir: source_dir.to_path_buf(),
    };

    let outcome = tracker
        .process(&request, &Zoned::now())
        .map_err(|e| e.to_string())?;

    if json {
        let json = serde_json::to_string(&outcome)
            .map_err(|e| format!("failed to serialize outcome: {e}"))?;
        println!("{json}");
    } else {
        print!("{}", format_outcome(&outcome));
    }
    Ok(())
}

/// Explicit file paths from `RESUME_FILE` / `CL_FILE`; empty values are ignored.
fn env_hints() -> ArtifactPair {
    let hint = |kind: ArtifactKind| {
        std::env::var_os(kind.env_var())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    };
    ArtifactPair {
        resume: hint(ArtifactKind::Resume),
        cover_letter: hint(ArtifactKind::CoverLetter),
    }
}

fn cmd_run(
    config_path: Option<&Path>,
    config: &Config,
    input: &Path,
    company: Option<&str>,
    wait_per_job: Option<u64>,
) -> Result<(), String> {
    let company = company.unwrap_or(UNKNOWN_COMPANY);

    let receipt = if config.generator.is_empty() {
        pipeline::enqueue(input, company, &config.exp_lib_dir)
    } else {
        pipeline::generate(&config.generator, input, company)
    }
    .map_err(|e| e.to_string())?;

    println!(
        "Batch of {} jobs: {}",
        receipt.job_count,
        receipt.order_file.display()
    );

    let per_job = wait_per_job.map_or_else(|| config.wait_per_job(), Duration::from_secs);
    match pipeline::wait_for_files(
        &config.exp_lib_dir,
        receipt.job_count,
        per_job,
        config.poll_interval(),
    ) {
        WaitOutcome::Ready { .. } => {}
        WaitOutcome::TimedOut {
            resumes,
            cover_letters,
        } => println!(
            "Timed out: {resumes} resumes and {cover_letters} cover letters of {} expected",
            receipt.job_count
        ),
    }

    pipeline::organize(config_path, config).map_err(|e| e.to_string())
}

fn cmd_init(config: &Config, base_dir: &Path) -> Result<(), String> {
    let path = base_dir.join(&config.spreadsheet_name);
    if path.exists() {
        return Err(format!("{} already exists", path.display()));
    }

    std::fs::create_dir_all(base_dir)
        .map_err(|e| format!("failed to create {}: {e}", base_dir.display()))?;
    create_workbook(&path).map_err(|e| e.to_string())?;

    println!("Created {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{ffi::OsStr, fs};

    use tempfile::TempDir;

    #[test]
    fn organize_with_unreadable_config_still_succeeds() {
        let cli = Cli::try_parse_from([
            "jobtrack",
            "--config",
            "/nonexistent/jobtrack.toml",
            "organize",
            "--yes",
        ])
        .unwrap();

        assert_eq!(dispatch(cli), Ok(()));
    }

    #[test]
    fn other_commands_fail_on_unreadable_config() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        fs::write(&config, "poll-interval = \"soon\"").unwrap();
        let input = dir.path().join("jobs.txt");
        fs::write(&input, "COMPANY: Acme\nPOSITION: Engineer\nJD:\nBuild.").unwrap();

        let cli = Cli::try_parse_from([
            OsStr::new("jobtrack"),
            OsStr::new("--config"),
            config.as_os_str(),
            OsStr::new("parse"),
            input.as_os_str(),
        ])
        .unwrap();

        let err = dispatch(cli).unwrap_err();
        assert!(err.contains("invalid config at"), "{err}");
    }
}
