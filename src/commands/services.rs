// src/commands/services.rs

//! Enable target services for what the source host ran

use crate::config::MigrationConfig;
use crate::inventory::InventoryReport;
use crate::journal::Journal;
use crate::mapping::PackageMapping;
use crate::system::SystemOps;
use anyhow::Result;
use tracing::warn;

/// Enable and start the target unit for every mapped package the source
/// host had installed. One unit's failure doesn't stop the batch.
pub fn cmd_enable_services(config: &MigrationConfig, sys: &dyn SystemOps) -> Result<()> {
    let report = InventoryReport::load(&config.inventory_report)?;
    let journal = Journal::open(&config.restore_log)?;
    let mapping = PackageMapping::builtin();

    let mut enabled = 0;
    for entry in mapping.entries() {
        let Some(unit) = entry.service else { continue };
        if !report.has_fact(entry.source) {
            continue;
        }
        match sys.service_enable_start(unit) {
            Ok(()) => {
                enabled += 1;
                println!("  enabled {}", unit);
                journal.log(&format!("service {} enabled and started", unit));
            }
            Err(e) => {
                warn!("Could not enable {}: {}", unit, e);
                println!("  {} FAILED: {}", unit, e);
                journal.log(&format!("service {} enable FAILED: {}", unit, e));
            }
        }
    }

    if enabled == 0 {
        println!("No mapped services to enable.");
    }
    Ok(())
}
