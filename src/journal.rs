// src/journal.rs

//! Append-only restore log
//!
//! Operator-facing record of everything the toolkit did on the target host,
//! one timestamped line per event. Separate from tracing output: the journal
//! is an artifact of the migration, kept next to the summary.

use crate::error::Result;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Timestamped append-only log file
#[derive(Debug)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    /// Open (creating parents as needed) the journal at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self { path: path.to_path_buf() })
    }

    /// Append one timestamped line. A journal write failure is warned about,
    /// never allowed to abort the action being journaled.
    pub fn log(&self, line: &str) {
        let stamped = format!("[{}] {}\n", Local::now().format("%Y-%m-%d %H:%M:%S"), line);
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut f| f.write_all(stamped.as_bytes()));
        if let Err(e) = result {
            warn!("Could not write restore log {}: {}", self.path.display(), e);
        }
    }

    /// Path of the underlying log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
