// src/commands/analyze.rs

//! Analyze the transferred inventory report

use crate::config::MigrationConfig;
use crate::inventory::{InventoryReport, SECTION_SERVICES_ENABLED};
use crate::journal::Journal;
use crate::mapping::PackageMapping;
use anyhow::Result;
use tracing::info;

/// Read the inventory report and show what the source host was running
pub fn cmd_analyze(config: &MigrationConfig) -> Result<()> {
    info!("Analyzing inventory report {}", config.inventory_report.display());
    let report = InventoryReport::load(&config.inventory_report)?;
    let journal = Journal::open(&config.restore_log)?;

    let mapping = PackageMapping::builtin();
    println!("Source packages with a target mapping:");
    let mut detected = 0;
    for entry in mapping.entries() {
        if report.has_fact(entry.source) {
            detected += 1;
            println!("  {:<20} -> {}", entry.source, entry.target);
        }
    }
    if detected == 0 {
        println!("  (none of the mapped packages appear in the report)");
    }

    println!("\nDatabase engines detected:");
    let pg = report.has_fact("postgresql-server");
    let mysql = report.has_fact("mariadb-server") || report.has_fact("mysql-server");
    println!("  PostgreSQL:    {}", if pg { "yes" } else { "no" });
    println!("  MariaDB/MySQL: {}", if mysql { "yes" } else { "no" });

    let enabled = report.section(SECTION_SERVICES_ENABLED);
    if !enabled.is_empty() {
        println!("\nServices enabled on the source host:");
        for line in &enabled {
            println!("  {}", line);
        }
    }

    journal.log(&format!(
        "analyze: {} mapped packages detected, postgres={}, mysql={}",
        detected, pg, mysql
    ));
    Ok(())
}
