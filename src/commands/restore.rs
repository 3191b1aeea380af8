// src/commands/restore.rs

//! Restore the transferred bundle and import database dumps
//!
//! The archive is extracted into a staging directory first; web root and
//! home directories are then copied into place wholesale. The staged /etc
//! is left for the operator to merge by hand, since overwriting the
//! target's live configuration wholesale would break the freshly installed
//! distribution.

use crate::config::MigrationConfig;
use crate::inventory::InventoryReport;
use crate::journal::Journal;
use crate::reconcile::database::{DatabaseReconciler, EngineReport};
use crate::system::SystemOps;
use anyhow::Result;
use tracing::{info, warn};

/// Extract the source bundle, restore files, and run both engines'
/// reconciliation procedures
pub fn cmd_restore_and_import(
    config: &MigrationConfig,
    sys: &dyn SystemOps,
) -> Result<Vec<EngineReport>> {
    let report = InventoryReport::load(&config.inventory_report)?;
    let journal = Journal::open(&config.restore_log)?;

    if !sys.file_exists(&config.source_archive) {
        journal.log(&format!("restore FAILED: missing bundle {}", config.source_archive.display()));
        return Err(crate::Error::MissingInput(config.source_archive.clone()).into());
    }

    info!("Extracting {} into {}", config.source_archive.display(), config.staging_dir.display());
    sys.extract_archive(&config.source_archive, &config.staging_dir)?;
    journal.log(&format!("bundle extracted to {}", config.staging_dir.display()));

    // Copy data trees into place; a failure on one tree doesn't stop the rest
    for dir in [&config.web_root, &config.home_root] {
        let rel = dir.to_string_lossy();
        let staged = config.staging_dir.join(rel.trim_start_matches('/'));
        if !staged.exists() {
            info!("No {} in the bundle, skipping", dir.display());
            continue;
        }
        match sys.copy_tree(&staged, dir) {
            Ok(()) => journal.log(&format!("restored {}", dir.display())),
            Err(e) => {
                warn!("Could not restore {}: {}", dir.display(), e);
                journal.log(&format!("restore of {} FAILED: {}", dir.display(), e));
            }
        }
    }
    let staged_etc = config.staging_dir.join(
        config.etc_dir.to_string_lossy().trim_start_matches('/'),
    );
    if staged_etc.exists() {
        println!("Source /etc staged at {}; merge needed entries by hand.", staged_etc.display());
        journal.log(&format!("source /etc staged at {}", staged_etc.display()));
    }

    // Database reconciliation: one forward pass per engine
    let reconciler = DatabaseReconciler::new(config, sys);
    let engines = vec![
        reconciler.reconcile_postgres(&report),
        reconciler.reconcile_mysql(&report),
    ];
    for engine in &engines {
        println!("{}: state {}, import {}", engine.engine, engine.state, engine.outcome);
        journal.log(&format!(
            "{}: state {}, import {}",
            engine.engine, engine.state, engine.outcome
        ));
        for note in &engine.notes {
            println!("  {}", note);
            journal.log(&format!("{}: {}", engine.engine, note));
        }
    }

    Ok(engines)
}

/// Re-apply ownership to restored trees
pub fn cmd_fix_permissions(config: &MigrationConfig, sys: &dyn SystemOps) -> Result<()> {
    let journal = Journal::open(&config.restore_log)?;

    if config.web_root.exists() {
        match sys.chown_tree(&config.web_owner, &config.web_root) {
            Ok(()) => journal.log(&format!("chown {} {}", config.web_owner, config.web_root.display())),
            Err(e) => {
                warn!("chown of {} failed: {}", config.web_root.display(), e);
                journal.log(&format!("chown of {} FAILED: {}", config.web_root.display(), e));
            }
        }
    }

    // Each home directory belongs to the user it is named after
    if let Ok(entries) = std::fs::read_dir(&config.home_root) {
        for entry in entries.filter_map(|e| e.ok()) {
            if !entry.path().is_dir() {
                continue;
            }
            let Ok(user) = entry.file_name().into_string() else { continue };
            let owner = format!("{}:{}", user, user);
            match sys.chown_tree(&owner, &entry.path()) {
                Ok(()) => journal.log(&format!("chown {} {}", owner, entry.path().display())),
                Err(e) => {
                    // The user may not exist on the target yet
                    warn!("chown of {} failed: {}", entry.path().display(), e);
                    journal.log(&format!("chown of {} FAILED: {}", entry.path().display(), e));
                }
            }
        }
    }

    println!("Ownership pass complete; failures (if any) are in the restore log.");
    Ok(())
}
