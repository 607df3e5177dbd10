//! Append-only JSONL progress log.
//!
//! Each accepted formula becomes one JSON object on its own line in
//! `<wrife_home>/progress.log`. The log is read back for the `progress`
//! report.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, WrifeError};
use crate::progress::traits::{ProgressRecord, ProgressSink};
use crate::util::{read_to_string_with_limit, MAX_PROGRESS_LOG_SIZE};

/// JSONL file sink.
#[derive(Debug, Clone)]
pub struct JsonlProgressLog {
    path: PathBuf,
}

impl JsonlProgressLog {
    /// Create a log writing to `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record to the log.
    pub fn append(&self, record: &ProgressRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                WrifeError::progress(format!(
                    "failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let json = serde_json::to_string(record)
            .map_err(|e| WrifeError::serde(format!("failed to serialize progress record: {}", e)))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                WrifeError::progress(format!(
                    "failed to open progress log {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

        writeln!(file, "{}", json).map_err(|e| {
            WrifeError::progress(format!(
                "failed to write progress log {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Read every record in the log.
    ///
    /// A missing log reads as empty. Lines that do not parse (a torn write,
    /// a record from a newer schema) are skipped with a warning.
    pub fn read_all(&self) -> Result<Vec<ProgressRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = read_to_string_with_limit(&self.path, MAX_PROGRESS_LOG_SIZE)?;

        let mut records = Vec::new();
        for (line_num, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ProgressRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(
                    "skipping progress record on line {} of {}: {}",
                    line_num + 1,
                    self.path.display(),
                    e
                ),
            }
        }

        Ok(records)
    }

    /// Read the records for one learner.
    pub fn read_learner(&self, learner_id: &str) -> Result<Vec<ProgressRecord>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|r| r.learner_id == learner_id)
            .collect())
    }
}

impl ProgressSink for JsonlProgressLog {
    fn record(&self, record: &ProgressRecord) -> Result<()> {
        self.append(record)
    }

    fn name(&self) -> &'static str {
        "jsonl"
    }
}
