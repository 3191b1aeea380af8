// src/collect.rs

//! Source-host collector
//!
//! Runs on the RPM-based source host before the migration: captures the
//! inventory report (installed packages, enabled and running service units,
//! network configuration), produces logical dumps for whichever database
//! engines are installed, and archives configuration and data. Raw database
//! storage directories are excluded from the archive; only the logical
//! dumps travel.

use crate::config::MigrationConfig;
use crate::error::{Error, Result};
use crate::inventory::{
    InventoryReport, SECTION_NETWORK, SECTION_PACKAGES, SECTION_SERVICES_ENABLED,
    SECTION_SERVICES_RUNNING,
};
use crate::system::SystemOps;
use std::fmt::Write as _;
use std::path::Path;
use std::process::Command;
use tracing::{info, warn};

fn capture(tool: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(tool)
        .args(args)
        .output()
        .map_err(|e| Error::Tool { tool: tool.to_string(), source: e })?;
    if !output.status.success() {
        return Err(Error::ToolFailed {
            tool: tool.to_string(),
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Capture the inventory report and write it to the configured path.
///
/// Sections that cannot be captured are recorded as empty rather than
/// aborting the whole collection; a partially useful report beats none.
pub fn write_inventory(config: &MigrationConfig) -> Result<InventoryReport> {
    let mut text = String::new();

    let sections: [(&str, &str, &[&str]); 4] = [
        (SECTION_PACKAGES, "rpm", &["-qa"]),
        (SECTION_SERVICES_ENABLED, "systemctl", &["list-unit-files", "--type=service", "--state=enabled", "--no-legend", "--no-pager"]),
        (SECTION_SERVICES_RUNNING, "systemctl", &["list-units", "--type=service", "--state=running", "--no-legend", "--no-pager"]),
        (SECTION_NETWORK, "ip", &["addr"]),
    ];

    for (header, tool, args) in sections {
        let _ = writeln!(text, "{}", header);
        match capture(tool, args) {
            Ok(captured) => {
                let _ = writeln!(text, "{}", captured.trim_end());
            }
            Err(e) => {
                warn!("Could not capture {} section: {}", header, e);
            }
        }
        let _ = writeln!(text);
    }

    if let Some(parent) = config.inventory_report.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&config.inventory_report, &text)?;
    info!("Inventory report written to {}", config.inventory_report.display());

    Ok(InventoryReport::from_lines(text.lines().map(|l| l.to_string()).collect()))
}

/// Dump every detected database engine to its logical dump artifact
pub fn dump_databases(config: &MigrationConfig, report: &InventoryReport) -> Result<()> {
    if report.has_fact("postgresql-server") {
        info!("Dumping PostgreSQL to {}", config.pg_dump.display());
        dump_to_file(
            "sudo",
            &["-u", "postgres", "pg_dumpall"],
            &config.pg_dump,
        )?;
    }
    if report.has_fact("mariadb-server") || report.has_fact("mysql-server") {
        info!("Dumping MariaDB/MySQL to {}", config.mysql_dump.display());
        dump_to_file(
            "mysqldump",
            &["--all-databases", "--single-transaction"],
            &config.mysql_dump,
        )?;
    }
    Ok(())
}

fn dump_to_file(tool: &str, args: &[&str], dest: &Path) -> Result<()> {
    let dump = capture(tool, args)?;
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(dest, dump)?;
    Ok(())
}

/// Archive configuration and data for transfer, excluding raw DB storage
pub fn create_bundle(config: &MigrationConfig, sys: &dyn SystemOps) -> Result<()> {
    let paths = vec![
        config.etc_dir.clone(),
        config.web_root.clone(),
        config.home_root.clone(),
    ];
    let excludes = vec![
        config.pg_data_root.to_string_lossy().to_string(),
        "/var/lib/pgsql".to_string(),
        "/var/lib/mysql".to_string(),
    ];
    info!("Creating source bundle at {}", config.source_archive.display());
    sys.create_archive(&config.source_archive, &paths, &excludes)
}

/// The scp invocation the operator runs to move the bundle; transfer itself
/// stays in the operator's hands.
pub fn transfer_hint(config: &MigrationConfig, target_host: &str) -> String {
    format!(
        "scp {} {} {} {} {}:{}/",
        config.inventory_report.display(),
        config.source_archive.display(),
        config.pg_dump.display(),
        config.mysql_dump.display(),
        target_host,
        config.work_dir.display(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn transfer_hint_names_every_artifact() {
        let dir = TempDir::new().unwrap();
        let mut config = MigrationConfig::default();
        config.work_dir = dir.path().to_path_buf();

        let hint = transfer_hint(&config, "target.example.org");
        assert!(hint.starts_with("scp "));
        assert!(hint.contains("target.example.org"));
        assert!(hint.contains("source-bundle.tar.gz"));
        assert!(hint.contains("postgres-all.sql"));
    }
}
