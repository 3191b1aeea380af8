// src/commands/backup.rs

//! Disk-space check, target self-backup, and rollback

use crate::backup;
use crate::config::MigrationConfig;
use crate::journal::Journal;
use crate::system::SystemOps;
use anyhow::Result;
use std::path::Path;

fn human(bytes: u64) -> String {
    const GIB: u64 = 1024 * 1024 * 1024;
    const MIB: u64 = 1024 * 1024;
    if bytes >= GIB {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    } else {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    }
}

/// Verify the target has room for the restore
pub fn cmd_check_space(config: &MigrationConfig, sys: &dyn SystemOps) -> Result<()> {
    let space = backup::check_space(config, sys)?;
    println!(
        "Available under {}: {} (required: {})",
        config.work_dir.display(),
        human(space.available),
        human(space.required)
    );
    if space.sufficient() {
        println!("Sufficient space for the migration.");
    } else {
        println!("WARNING: not enough free space; free up disk before restoring.");
    }
    Ok(())
}

/// Snapshot the target host before any mutating action
pub fn cmd_backup(config: &MigrationConfig, sys: &dyn SystemOps) -> Result<()> {
    let journal = Journal::open(&config.restore_log)?;
    match backup::create_backup(config, sys) {
        Ok(archive) => {
            println!("Backup created: {}", archive.display());
            journal.log(&format!("backup created: {}", archive.display()));
            Ok(())
        }
        Err(e) => {
            journal.log(&format!("backup FAILED: {}", e));
            Err(e.into())
        }
    }
}

/// Restore the newest self-backup over the filesystem root
pub fn cmd_rollback(config: &MigrationConfig, sys: &dyn SystemOps) -> Result<()> {
    let journal = Journal::open(&config.restore_log)?;
    match backup::rollback(config, sys, Path::new("/")) {
        Ok(archive) => {
            println!("Rolled back from {}", archive.display());
            println!("Review restored configuration and restart affected services.");
            journal.log(&format!("rollback applied from {}", archive.display()));
            Ok(())
        }
        Err(e) => {
            println!("Rollback failed: {}", e);
            journal.log(&format!("rollback FAILED: {}", e));
            Err(e.into())
        }
    }
}
