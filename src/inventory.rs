// src/inventory.rs

//! Inventory report captured on the source host
//!
//! The report is a plain-text concatenation of the source host's installed
//! packages, enabled/running service units, and network configuration,
//! written by the collector (`collect` module). On the target host it is
//! immutable: components only ask presence questions against it.

use crate::error::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Section headers written by the collector
pub const SECTION_PACKAGES: &str = "### packages";
pub const SECTION_SERVICES_ENABLED: &str = "### services-enabled";
pub const SECTION_SERVICES_RUNNING: &str = "### services-running";
pub const SECTION_NETWORK: &str = "### network";

/// Ordered lines captured from the source host, read-only once loaded
#[derive(Debug, Clone)]
pub struct InventoryReport {
    lines: Vec<String>,
}

impl InventoryReport {
    /// Load the report from disk. A missing report is a fatal setup error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        let lines: Vec<String> = raw.lines().map(|l| l.to_string()).collect();
        debug!("Loaded inventory report: {} lines from {}", lines.len(), path.display());
        Ok(Self { lines })
    }

    /// Build a report from already-captured lines (collector and tests)
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Presence probe: does any line of the report mention `key`?
    pub fn has_fact(&self, key: &str) -> bool {
        self.lines.iter().any(|line| line.contains(key))
    }

    /// All lines of the report, in captured order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|s| s.as_str())
    }

    /// Lines belonging to one collector section, headers excluded
    pub fn section(&self, header: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let mut in_section = false;
        for line in &self.lines {
            if line.starts_with("### ") {
                in_section = line.as_str() == header;
                continue;
            }
            if in_section && !line.trim().is_empty() {
                out.push(line.as_str());
            }
        }
        out
    }
}
