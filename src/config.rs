//! jobtrack configuration.
//!
//! Loaded from `--config <path>` or `~/.jobtrack/config.toml`.
//! Every field has a default, so a missing default file is not an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// jobtrack configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Base directory holding the tracking spreadsheet and the
    /// `resume and cover letters/` tree.
    pub cvs_dir: PathBuf,

    /// Directory where the generation step drops PDFs and batch order files.
    pub exp_lib_dir: PathBuf,

    /// Filename of the tracking spreadsheet.
    pub spreadsheet_name: String,

    /// Command (program and leading arguments) that sends jobs for generation.
    /// The input file and optional company are appended.
    /// Empty means `run` writes the batch order itself.
    pub generator: Vec<String>,

    /// Seconds to wait per expected job before giving up on generated files.
    pub wait_per_job: u64,

    /// Seconds between file count checks while waiting.
    pub poll_interval: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cvs_dir: PathBuf::from("cvs"),
            exp_lib_dir: PathBuf::from("exp_lib"),
            spreadsheet_name: "job-applications.xlsx".to_string(),
            generator: Vec::new(),
            wait_per_job: 120,
            poll_interval: 15,
        }
    }
}

impl Config {
    /// Load config from an explicit path, or from `~/.jobtrack/config.toml`.
    ///
    /// An explicit path must exist. The default path may be absent,
    /// in which case defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self, String> {
        let path = match explicit {
            Some(p) => {
                if !p.exists() {
                    return Err(format!("no config file found at {}", p.display()));
                }
                p.to_path_buf()
            }
            None => match Self::path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        Self::from_file(&path)
    }

    fn from_file(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .map_err(|e| format!("invalid config at {}: {e}", path.display()))?;

        if config.spreadsheet_name.is_empty() {
            return Err(format!(
                "spreadsheet-name is empty in {}\n\
                 Set it to the tracker filename, e.g. \"job-applications.xlsx\".",
                path.display()
            ));
        }

        if config.poll_interval == 0 {
            return Err(format!(
                "poll-interval must be at least 1 second in {}",
                path.display()
            ));
        }

        Ok(config)
    }

    /// The default config file path: `~/.jobtrack/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".jobtrack").join("config.toml"))
    }

    pub fn wait_per_job(&self) -> Duration {
        Duration::from_secs(self.wait_per_job)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }
}
