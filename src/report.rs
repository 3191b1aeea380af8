// src/report.rs

//! Final migration summary
//!
//! Pure aggregation: probe facts, the package plan, and both engines'
//! terminal states rendered into one operator-facing report. No decisions
//! are made here and nothing is mutated beyond writing the artifact.

use crate::config::MigrationConfig;
use crate::error::Result;
use crate::inventory::InventoryReport;
use crate::mapping::PackageMapping;
use crate::reconcile::database::EngineReport;
use crate::reconcile::packages::PackagePlan;
use chrono::Local;
use std::fmt::Write as _;
use std::path::Path;

/// Inputs for the summary, all produced elsewhere
pub struct MigrationSummary<'a> {
    pub report: &'a InventoryReport,
    pub mapping: &'a PackageMapping,
    pub packages: &'a [PackagePlan],
    pub engines: &'a [EngineReport],
}

impl<'a> MigrationSummary<'a> {
    /// Render the full summary as structured text
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "crossgrade migration summary ({})", Local::now().format("%Y-%m-%d %H:%M:%S"));
        let _ = writeln!(out, "{}", "=".repeat(60));

        let _ = writeln!(out, "\nSource inventory facts:");
        for entry in self.mapping.entries() {
            let mark = if self.report.has_fact(entry.source) { "present" } else { "absent" };
            let _ = writeln!(out, "  {:<20} {}", entry.source, mark);
        }

        let _ = writeln!(out, "\nPackage reconciliation:");
        if self.packages.is_empty() {
            let _ = writeln!(out, "  (not run)");
        }
        for row in self.packages {
            let _ = writeln!(out, "  {:<20} -> {:<22} {}", row.source, row.target, row.action);
        }

        let _ = writeln!(out, "\nDatabase engines:");
        if self.engines.is_empty() {
            let _ = writeln!(out, "  (not run)");
        }
        for engine in self.engines {
            let _ = writeln!(out, "  {:<16} state: {:<28} import: {}", engine.engine.to_string(), engine.state.to_string(), engine.outcome);
            for note in &engine.notes {
                let _ = writeln!(out, "    note: {}", note);
            }
        }

        out
    }

    /// Write the rendered summary to the configured artifact path
    pub fn write(&self, config: &MigrationConfig) -> Result<()> {
        self.write_to(&config.summary_path)
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.render())?;
        Ok(())
    }
}
