// src/backup.rs

//! Target-host self-backup and rollback
//!
//! Before any mutating action the operator snapshots the target's own
//! configuration and data into a timestamped archive. Rollback restores the
//! newest such archive; with no archive present it reports failure without
//! touching the filesystem.

use crate::config::MigrationConfig;
use crate::error::{Error, Result};
use crate::system::SystemOps;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const BACKUP_PREFIX: &str = "crossgrade-backup-";

/// Free-space check result for the operator
#[derive(Debug, Clone, Copy)]
pub struct SpaceReport {
    pub available: u64,
    pub required: u64,
}

impl SpaceReport {
    pub fn sufficient(&self) -> bool {
        self.available >= self.required
    }
}

/// Compare available space under the work directory against the configured minimum
pub fn check_space(config: &MigrationConfig, sys: &dyn SystemOps) -> Result<SpaceReport> {
    std::fs::create_dir_all(&config.work_dir)?;
    let available = sys.available_space(&config.work_dir)?;
    Ok(SpaceReport { available, required: config.min_free_bytes })
}

/// Archive the target's own /etc, web root, and home directories, excluding
/// raw database storage. Returns the created archive path.
pub fn create_backup(config: &MigrationConfig, sys: &dyn SystemOps) -> Result<PathBuf> {
    std::fs::create_dir_all(&config.backup_dir)?;
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let archive = config.backup_dir.join(format!("{}{}.tar.gz", BACKUP_PREFIX, stamp));

    let paths = vec![
        config.etc_dir.clone(),
        config.web_root.clone(),
        config.home_root.clone(),
    ];
    // Raw database storage is never carried in archives; only logical dumps
    let excludes = vec![
        config.pg_data_root.to_string_lossy().to_string(),
        "/var/lib/mysql".to_string(),
    ];

    info!("Creating target self-backup at {}", archive.display());
    sys.create_archive(&archive, &paths, &excludes)?;
    Ok(archive)
}

/// Newest backup archive in the backup directory, if any
pub fn latest_backup(config: &MigrationConfig) -> Option<PathBuf> {
    let entries = std::fs::read_dir(&config.backup_dir).ok()?;
    let mut archives: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(BACKUP_PREFIX) && n.ends_with(".tar.gz"))
                .unwrap_or(false)
        })
        .collect();
    // Timestamped names sort chronologically
    archives.sort();
    archives.pop()
}

/// Restore the newest self-backup over the filesystem root.
///
/// A missing archive is a reported failure; no extraction is attempted.
pub fn rollback(config: &MigrationConfig, sys: &dyn SystemOps, root: &Path) -> Result<PathBuf> {
    let Some(archive) = latest_backup(config) else {
        warn!("Rollback requested but no backup archive exists in {}", config.backup_dir.display());
        return Err(Error::MissingInput(config.backup_dir.join(format!("{}*.tar.gz", BACKUP_PREFIX))));
    };

    info!("Rolling back from {}", archive.display());
    sys.extract_archive(&archive, root)?;
    Ok(archive)
}
