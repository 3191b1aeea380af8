// src/commands/verify.rs

//! Verify the migrated host and render the final summary

use crate::config::MigrationConfig;
use crate::inventory::InventoryReport;
use crate::journal::Journal;
use crate::mapping::PackageMapping;
use crate::reconcile::database::EngineReport;
use crate::reconcile::packages::PackagePlan;
use crate::report::MigrationSummary;
use crate::system::SystemOps;
use anyhow::Result;
use tracing::info;

/// External tools every target-host action leans on
const REQUIRED_TOOLS: &[&str] = &["apt-get", "dpkg-query", "systemctl", "tar"];

/// Check tools, installed packages, and service state on the target
pub fn cmd_verify(config: &MigrationConfig, sys: &dyn SystemOps) -> Result<()> {
    let report = InventoryReport::load(&config.inventory_report)?;
    let mapping = PackageMapping::builtin();

    println!("Required tools:");
    for tool in REQUIRED_TOOLS {
        match which::which(tool) {
            Ok(path) => println!("  {:<12} {}", tool, path.display()),
            Err(_) => println!("  {:<12} MISSING", tool),
        }
    }

    println!("\nMapped packages on the target:");
    for entry in mapping.entries() {
        if !report.has_fact(entry.source) {
            continue;
        }
        let installed = sys.query_installed(entry.target);
        println!("  {:<22} {}", entry.target, if installed { "installed" } else { "NOT INSTALLED" });
    }

    println!("\nServices:");
    for entry in mapping.entries() {
        let Some(unit) = entry.service else { continue };
        if !report.has_fact(entry.source) {
            continue;
        }
        let active = sys.service_is_active(unit);
        println!("  {:<22} {}", unit, if active { "active" } else { "inactive" });
    }

    if report.has_fact("postgresql-server") {
        let socket = sys.socket_exists(&config.pg_socket);
        println!("\nPostgreSQL socket {}: {}", config.pg_socket.display(), if socket { "present" } else { "absent" });
    }

    Ok(())
}

/// Aggregate facts and reconciler outcomes into the summary artifact.
///
/// `packages` and `engines` carry this session's reconciler results; when
/// invoked standalone they are empty and the summary says so.
pub fn cmd_summarize(
    config: &MigrationConfig,
    packages: &[PackagePlan],
    engines: &[EngineReport],
) -> Result<()> {
    let report = InventoryReport::load(&config.inventory_report)?;
    let journal = Journal::open(&config.restore_log)?;
    let mapping = PackageMapping::builtin();

    let summary = MigrationSummary {
        report: &report,
        mapping: &mapping,
        packages,
        engines,
    };
    let text = summary.render();
    print!("{}", text);
    summary.write(config)?;
    info!("Summary written to {}", config.summary_path.display());
    journal.log(&format!("summary written to {}", config.summary_path.display()));
    Ok(())
}
