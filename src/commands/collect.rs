// src/commands/collect.rs

//! Source-host collection command

use crate::collect;
use crate::config::MigrationConfig;
use crate::system::SystemOps;
use anyhow::Result;

/// Capture the inventory, dump detected databases, and bundle configuration
/// and data for transfer. Run on the source host.
pub fn cmd_collect(config: &MigrationConfig, sys: &dyn SystemOps, target_host: Option<&str>) -> Result<()> {
    let report = collect::write_inventory(config)?;
    println!("Inventory report: {}", config.inventory_report.display());

    collect::dump_databases(config, &report)?;
    collect::create_bundle(config, sys)?;
    println!("Bundle: {}", config.source_archive.display());

    if let Some(host) = target_host {
        println!("\nTransfer with:\n  {}", collect::transfer_hint(config, host));
    }
    Ok(())
}
