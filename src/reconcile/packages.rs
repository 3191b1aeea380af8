// src/reconcile/packages.rs

//! Package reconciliation
//!
//! Walks the mapping table against the source inventory and the target's
//! installed set, installing what is missing. One failed install logs and
//! moves on; a batch is never aborted by a single package.

use crate::inventory::InventoryReport;
use crate::mapping::PackageMapping;
use crate::system::SystemOps;
use tracing::{debug, info, warn};

/// What happened (or didn't) for one mapping entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageAction {
    /// Source package not mentioned in the inventory; nothing attempted
    Skipped,
    /// Target package already present; nothing attempted
    AlreadyInstalled,
    /// Target package installed by this run
    Installed,
    /// Install was attempted and the package manager reported failure
    InstallFailed,
}

impl std::fmt::Display for PackageAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skipped => write!(f, "skipped"),
            Self::AlreadyInstalled => write!(f, "already installed"),
            Self::Installed => write!(f, "installed"),
            Self::InstallFailed => write!(f, "install FAILED"),
        }
    }
}

/// One row of the reconciliation result, in mapping-table order
#[derive(Debug, Clone)]
pub struct PackagePlan {
    pub source: String,
    pub target: String,
    pub action: PackageAction,
}

/// Reconcile the target's package set against the source inventory.
///
/// For each mapping entry: skip entries the inventory never mentions,
/// record already-installed targets without touching them, install the
/// rest and record the outcome.
pub fn reconcile_packages(
    report: &InventoryReport,
    mapping: &PackageMapping,
    sys: &dyn SystemOps,
) -> Vec<PackagePlan> {
    let mut plan = Vec::with_capacity(mapping.entries().len());

    for entry in mapping.entries() {
        let action = if !report.has_fact(entry.source) {
            debug!("{}: not in source inventory, skipping", entry.source);
            PackageAction::Skipped
        } else if sys.query_installed(entry.target) {
            debug!("{}: target {} already installed", entry.source, entry.target);
            PackageAction::AlreadyInstalled
        } else {
            info!("Installing {} (source package {})", entry.target, entry.source);
            match sys.install_package(entry.target) {
                Ok(()) => PackageAction::Installed,
                Err(e) => {
                    warn!("Install of {} failed: {}", entry.target, e);
                    PackageAction::InstallFailed
                }
            }
        };

        plan.push(PackagePlan {
            source: entry.source.to_string(),
            target: entry.target.to_string(),
            action,
        });
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::system::{Engine, ImportResult, SystemOps};
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};

    /// Scripted stand-in for the package manager side of [`SystemOps`]
    struct FakeSystem {
        installed: RefCell<HashSet<String>>,
        failing: HashSet<String>,
        install_calls: RefCell<Vec<String>>,
    }

    impl FakeSystem {
        fn new(installed: &[&str], failing: &[&str]) -> Self {
            Self {
                installed: RefCell::new(installed.iter().map(|s| s.to_string()).collect()),
                failing: failing.iter().map(|s| s.to_string()).collect(),
                install_calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl SystemOps for FakeSystem {
        fn query_installed(&self, package: &str) -> bool {
            self.installed.borrow().contains(package)
        }

        fn install_package(&self, package: &str) -> Result<()> {
            self.install_calls.borrow_mut().push(package.to_string());
            if self.failing.contains(package) {
                return Err(Error::ToolFailed {
                    tool: "apt-get".to_string(),
                    detail: format!("unable to locate package {}", package),
                });
            }
            self.installed.borrow_mut().insert(package.to_string());
            Ok(())
        }

        fn service_enable_start(&self, _unit: &str) -> Result<()> {
            Ok(())
        }
        fn service_is_active(&self, _unit: &str) -> bool {
            false
        }
        fn service_stop(&self, _unit: &str) -> Result<()> {
            Ok(())
        }
        fn socket_exists(&self, _path: &Path) -> bool {
            false
        }
        fn file_exists(&self, _path: &Path) -> bool {
            false
        }
        fn pg_version_dir(&self, _data_root: &Path) -> Option<String> {
            None
        }
        fn drop_cluster(&self, _version: &str) {}
        fn delete_cluster_dir(&self, _data_root: &Path, _version: &str) {}
        fn create_cluster(&self, _version: &str) -> Result<()> {
            Ok(())
        }
        fn import_dump(&self, _engine: Engine, _dump: &Path) -> Result<ImportResult> {
            Ok(ImportResult { success: true, stderr: String::new() })
        }
        fn create_archive(&self, _a: &Path, _p: &[PathBuf], _e: &[String]) -> Result<()> {
            Ok(())
        }
        fn extract_archive(&self, _a: &Path, _d: &Path) -> Result<()> {
            Ok(())
        }
        fn copy_tree(&self, _s: &Path, _d: &Path) -> Result<()> {
            Ok(())
        }
        fn chown_tree(&self, _o: &str, _p: &Path) -> Result<()> {
            Ok(())
        }
        fn available_space(&self, _p: &Path) -> Result<u64> {
            Ok(u64::MAX)
        }
    }

    fn report_with(packages: &[&str]) -> InventoryReport {
        InventoryReport::from_lines(packages.iter().map(|p| format!("{}-1.0.el9.x86_64", p)).collect())
    }

    #[test]
    fn unmentioned_entries_are_never_installed() {
        let report = report_with(&["httpd"]);
        let sys = FakeSystem::new(&[], &[]);

        let plan = reconcile_packages(&report, &PackageMapping::builtin(), &sys);

        for row in &plan {
            if row.source != "httpd" {
                assert_eq!(row.action, PackageAction::Skipped, "{}", row.source);
            }
        }
        assert_eq!(sys.install_calls.borrow().as_slice(), ["apache2"]);
    }

    #[test]
    fn already_installed_targets_are_not_reinstalled() {
        let report = report_with(&["httpd", "vsftpd"]);
        let sys = FakeSystem::new(&["apache2"], &[]);

        let plan = reconcile_packages(&report, &PackageMapping::builtin(), &sys);

        let httpd = plan.iter().find(|r| r.source == "httpd").unwrap();
        assert_eq!(httpd.action, PackageAction::AlreadyInstalled);
        let vsftpd = plan.iter().find(|r| r.source == "vsftpd").unwrap();
        assert_eq!(vsftpd.action, PackageAction::Installed);
        assert_eq!(sys.install_calls.borrow().as_slice(), ["vsftpd"]);
    }

    #[test]
    fn one_failure_does_not_abort_the_batch() {
        // bind precedes rsync in the table; its failure must not stop rsync
        let report = report_with(&["bind", "rsync"]);
        let sys = FakeSystem::new(&[], &["bind9"]);

        let plan = reconcile_packages(&report, &PackageMapping::builtin(), &sys);

        let bind = plan.iter().find(|r| r.source == "bind").unwrap();
        assert_eq!(bind.action, PackageAction::InstallFailed);
        let rsync = plan.iter().find(|r| r.source == "rsync").unwrap();
        assert_eq!(rsync.action, PackageAction::Installed);
    }

    #[test]
    fn second_pass_is_idempotent() {
        let report = report_with(&["httpd", "chrony", "rsync"]);
        let sys = FakeSystem::new(&[], &[]);

        let first = reconcile_packages(&report, &PackageMapping::builtin(), &sys);
        let second = reconcile_packages(&report, &PackageMapping::builtin(), &sys);

        for (a, b) in first.iter().zip(second.iter()) {
            if a.action == PackageAction::Installed {
                assert_eq!(b.action, PackageAction::AlreadyInstalled, "{}", b.target);
            }
        }
    }
}
