// src/commands/packages.rs

//! Install mapped packages on the target host

use crate::config::MigrationConfig;
use crate::inventory::InventoryReport;
use crate::journal::Journal;
use crate::mapping::PackageMapping;
use crate::reconcile::packages::{reconcile_packages, PackageAction, PackagePlan};
use crate::system::SystemOps;
use anyhow::Result;

/// Reconcile the target's package set against the source inventory
pub fn cmd_install_packages(
    config: &MigrationConfig,
    sys: &dyn SystemOps,
) -> Result<Vec<PackagePlan>> {
    let report = InventoryReport::load(&config.inventory_report)?;
    let journal = Journal::open(&config.restore_log)?;
    let mapping = PackageMapping::builtin();

    let plan = reconcile_packages(&report, &mapping, sys);

    let mut failures = 0;
    for row in &plan {
        if row.action == PackageAction::Skipped {
            continue;
        }
        println!("  {:<20} -> {:<22} {}", row.source, row.target, row.action);
        journal.log(&format!("package {} -> {}: {}", row.source, row.target, row.action));
        if row.action == PackageAction::InstallFailed {
            failures += 1;
        }
    }

    if failures > 0 {
        println!("{} package(s) failed to install; see the restore log.", failures);
    } else {
        println!("Package reconciliation complete.");
    }
    Ok(plan)
}
