//! Batch order files: the checkpoint between generation and organizing.
//!
//! Orders live directly in the exp_lib directory and move to `archive/`
//! once organized, so each order is processed at most once:
//!
//! ```text
//! <exp_lib>/
//!   batch_order_<id>.json    # Pending orders
//!   archive/
//!     batch_order_<id>.json  # Organized orders
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use crate::{model::BatchOrder, tracker::move_file};

const ORDER_PREFIX: &str = "batch_order_";
const ORDER_SUFFIX: &str = ".json";

/// Errors that can occur while reading, writing, or archiving order files.
#[derive(Debug, thiserror::Error)]
pub enum OrganizeError {
    #[error("no batch_order_*.json found in {}", .0.display())]
    NoOrderFile(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, OrganizeError>;

/// The directory batch orders are written to and read from.
pub struct OrderQueue {
    dir: PathBuf,
}

impl OrderQueue {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes an order as `batch_order_<id>.json`, creating the directory if needed.
    pub fn write(&self, order: &BatchOrder) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(order.file_name());
        let json = serde_json::to_string_pretty(order)?;
        fs::write(&path, json)?;
        Ok(path)
    }

    /// Returns the most recently modified pending order file.
    pub fn latest(&self) -> Result<PathBuf> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(OrganizeError::NoOrderFile(self.dir.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut newest: Option<(SystemTime, PathBuf)> = None;
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !is_order_file_name(&name) || !entry.file_type()?.is_file() {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            if newest.as_ref().is_none_or(|(t, _)| modified > *t) {
                newest = Some((modified, entry.path()));
            }
        }

        newest
            .map(|(_, path)| path)
            .ok_or_else(|| OrganizeError::NoOrderFile(self.dir.clone()))
    }

    /// Loads an order file.
    pub fn load(&self, path: &Path) -> Result<BatchOrder> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Moves an order file into `archive/` so it is never processed again.
    pub fn archive(&self, path: &Path) -> Result<PathBuf> {
        let archive = self.dir.join("archive");
        fs::create_dir_all(&archive)?;
        let name = path
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "order path has no name"))?;
        let target = archive.join(name);
        move_file(path, &target)?;
        Ok(target)
    }
}

fn is_order_file_name(name: &str) -> bool {
    name.starts_with(ORDER_PREFIX) && name.ends_with(ORDER_SUFFIX)
}
