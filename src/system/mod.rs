// src/system/mod.rs

//! Collaborator seam for external tools
//!
//! Everything the toolkit asks of the operating system goes through the
//! [`SystemOps`] trait: package manager, service manager, PostgreSQL cluster
//! tooling, database clients, and bulk filesystem operations. The production
//! implementation ([`HostSystem`]) shells out to the real tools; tests
//! substitute scripted doubles.

mod host;

pub use host::HostSystem;

use crate::error::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Database engines the toolkit migrates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    Postgres,
    MySql,
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Postgres => write!(f, "PostgreSQL"),
            Self::MySql => write!(f, "MariaDB/MySQL"),
        }
    }
}

/// Result of a dump import: the tool's exit signal plus captured stderr
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub success: bool,
    pub stderr: String,
}

/// Narrow interface over every external tool the toolkit invokes.
///
/// Calls are synchronous and blocking; predicates carry no caching, each
/// call reflects current host state.
pub trait SystemOps {
    /// Is the target package currently installed?
    fn query_installed(&self, package: &str) -> bool;

    /// Install one target package
    fn install_package(&self, package: &str) -> Result<()>;

    /// Enable and start a service unit
    fn service_enable_start(&self, unit: &str) -> Result<()>;

    /// Is the unit currently active?
    fn service_is_active(&self, unit: &str) -> bool;

    /// Stop a service unit
    fn service_stop(&self, unit: &str) -> Result<()>;

    /// Does the given filesystem socket exist?
    fn socket_exists(&self, path: &Path) -> bool;

    /// Does a regular file exist? (dump artifacts, archives)
    fn file_exists(&self, path: &Path) -> bool;

    /// Name of the first child of the PostgreSQL data root, if any.
    /// On a Debian-family layout that child is the cluster version.
    fn pg_version_dir(&self, data_root: &Path) -> Option<String>;

    /// Drop a PostgreSQL cluster. Best-effort: its own failure is ignored
    /// by callers, so none is reported.
    fn drop_cluster(&self, version: &str);

    /// Remove the on-disk cluster directory for one version
    fn delete_cluster_dir(&self, data_root: &Path, version: &str);

    /// Create a fresh PostgreSQL cluster for one version
    fn create_cluster(&self, version: &str) -> Result<()>;

    /// Import a logical dump into the named engine
    fn import_dump(&self, engine: Engine, dump: &Path) -> Result<ImportResult>;

    /// Create a compressed archive of `paths` (relative to `/`), skipping `excludes`
    fn create_archive(&self, archive: &Path, paths: &[PathBuf], excludes: &[String]) -> Result<()>;

    /// Extract a compressed archive under `dest`
    fn extract_archive(&self, archive: &Path, dest: &Path) -> Result<()>;

    /// Recursively copy the contents of `src` into `dest`
    fn copy_tree(&self, src: &Path, dest: &Path) -> Result<()>;

    /// Recursively change ownership of `path` to `owner` (`user` or `user:group`)
    fn chown_tree(&self, owner: &str, path: &Path) -> Result<()>;

    /// Bytes available on the filesystem holding `path`
    fn available_space(&self, path: &Path) -> Result<u64>;
}

/// Bounded readiness poll: re-check `probe` up to `max_attempts` times,
/// sleeping `interval` between attempts. Returns as soon as the probe holds.
///
/// Replaces a fixed post-start settle delay with a deterministic
/// ready/not-ready answer.
pub fn wait_until<F>(mut probe: F, interval: Duration, max_attempts: u32) -> bool
where
    F: FnMut() -> bool,
{
    for attempt in 0..max_attempts {
        if probe() {
            return true;
        }
        if attempt + 1 < max_attempts {
            std::thread::sleep(interval);
        }
    }
    false
}
