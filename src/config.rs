// src/config.rs

//! Migration configuration
//!
//! Every path and tunable the toolkit touches lives here as a named field,
//! loadable from a TOML file with per-field defaults. There is no other
//! source of paths: components receive a `MigrationConfig` at construction
//! and never consult the environment.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Toolkit configuration, one field per path or tunable
#[derive(Debug, Clone, Deserialize)]
pub struct MigrationConfig {
    /// Shared directory holding the transferred bundle and produced artifacts
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// Inventory report captured on the source host
    #[serde(default = "default_inventory_report")]
    pub inventory_report: PathBuf,

    /// Whole-filesystem archive of the source host's configuration and data
    #[serde(default = "default_source_archive")]
    pub source_archive: PathBuf,

    /// Logical PostgreSQL dump (pg_dumpall output), present only if detected
    #[serde(default = "default_pg_dump")]
    pub pg_dump: PathBuf,

    /// Logical MariaDB/MySQL dump, present only if detected
    #[serde(default = "default_mysql_dump")]
    pub mysql_dump: PathBuf,

    /// Directory receiving target-host self-backup archives
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,

    /// Append-only restore log
    #[serde(default = "default_restore_log")]
    pub restore_log: PathBuf,

    /// Final summary report
    #[serde(default = "default_summary_path")]
    pub summary_path: PathBuf,

    /// Staging directory for archive extraction before files are copied into place
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// Web document root restored from the source host
    #[serde(default = "default_web_root")]
    pub web_root: PathBuf,

    /// Home directory root restored from the source host
    #[serde(default = "default_home_root")]
    pub home_root: PathBuf,

    /// System configuration directory included in backups and the bundle
    #[serde(default = "default_etc_dir")]
    pub etc_dir: PathBuf,

    /// Owner applied to the restored web root
    #[serde(default = "default_web_owner")]
    pub web_owner: String,

    /// PostgreSQL data root; its first child names the cluster version
    #[serde(default = "default_pg_data_root")]
    pub pg_data_root: PathBuf,

    /// PostgreSQL listening socket probed for readiness
    #[serde(default = "default_pg_socket")]
    pub pg_socket: PathBuf,

    /// Cluster version used when the data root names none
    #[serde(default = "default_pg_fallback_version")]
    pub pg_fallback_version: String,

    /// Seconds between readiness probes after starting a service
    #[serde(default = "default_settle_interval_secs")]
    pub settle_interval_secs: u64,

    /// Number of readiness probes before giving up
    #[serde(default = "default_settle_max_attempts")]
    pub settle_max_attempts: u32,

    /// Minimum free bytes required on the target before restoring
    #[serde(default = "default_min_free_bytes")]
    pub min_free_bytes: u64,
}

fn default_work_dir() -> PathBuf {
    PathBuf::from("/var/lib/crossgrade")
}
fn default_inventory_report() -> PathBuf {
    default_work_dir().join("inventory-report.txt")
}
fn default_source_archive() -> PathBuf {
    default_work_dir().join("source-bundle.tar.gz")
}
fn default_pg_dump() -> PathBuf {
    default_work_dir().join("postgres-all.sql")
}
fn default_mysql_dump() -> PathBuf {
    default_work_dir().join("mysql-all.sql")
}
fn default_backup_dir() -> PathBuf {
    default_work_dir().join("backups")
}
fn default_restore_log() -> PathBuf {
    default_work_dir().join("restore.log")
}
fn default_summary_path() -> PathBuf {
    default_work_dir().join("summary.txt")
}
fn default_staging_dir() -> PathBuf {
    default_work_dir().join("staging")
}
fn default_web_root() -> PathBuf {
    PathBuf::from("/var/www")
}
fn default_home_root() -> PathBuf {
    PathBuf::from("/home")
}
fn default_etc_dir() -> PathBuf {
    PathBuf::from("/etc")
}
fn default_web_owner() -> String {
    "www-data".to_string()
}
fn default_pg_data_root() -> PathBuf {
    PathBuf::from("/var/lib/postgresql")
}
fn default_pg_socket() -> PathBuf {
    PathBuf::from("/var/run/postgresql/.s.PGSQL.5432")
}
fn default_pg_fallback_version() -> String {
    "15".to_string()
}
fn default_settle_interval_secs() -> u64 {
    1
}
fn default_settle_max_attempts() -> u32 {
    15
}
fn default_min_free_bytes() -> u64 {
    2 * 1024 * 1024 * 1024
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            inventory_report: default_inventory_report(),
            source_archive: default_source_archive(),
            pg_dump: default_pg_dump(),
            mysql_dump: default_mysql_dump(),
            backup_dir: default_backup_dir(),
            restore_log: default_restore_log(),
            summary_path: default_summary_path(),
            staging_dir: default_staging_dir(),
            web_root: default_web_root(),
            home_root: default_home_root(),
            etc_dir: default_etc_dir(),
            web_owner: default_web_owner(),
            pg_data_root: default_pg_data_root(),
            pg_socket: default_pg_socket(),
            pg_fallback_version: default_pg_fallback_version(),
            settle_interval_secs: default_settle_interval_secs(),
            settle_max_attempts: default_settle_max_attempts(),
            min_free_bytes: default_min_free_bytes(),
        }
    }
}

impl MigrationConfig {
    /// Load configuration from a TOML file.
    ///
    /// A `None` path yields the built-in defaults. An explicitly named file
    /// that does not exist is a setup error, not a silent fallback.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Interval between readiness probes
    pub fn settle_interval(&self) -> Duration {
        Duration::from_secs(self.settle_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: MigrationConfig = toml::from_str("").unwrap();
        assert_eq!(config.work_dir, PathBuf::from("/var/lib/crossgrade"));
        assert_eq!(config.pg_fallback_version, "15");
        assert_eq!(config.settle_max_attempts, 15);
        assert_eq!(config.web_owner, "www-data");
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "work_dir = \"/srv/migration\"").unwrap();
        writeln!(file, "settle_max_attempts = 3").unwrap();
        file.flush().unwrap();

        let config = MigrationConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.work_dir, PathBuf::from("/srv/migration"));
        assert_eq!(config.settle_max_attempts, 3);
        // Untouched fields keep their defaults
        assert_eq!(config.pg_socket, PathBuf::from("/var/run/postgresql/.s.PGSQL.5432"));
    }

    #[test]
    fn missing_explicit_config_is_fatal() {
        let err = MigrationConfig::load(Some(Path::new("/nonexistent/crossgrade.toml")))
            .unwrap_err();
        assert!(matches!(err, crate::Error::MissingInput(_)));
    }
}
