// src/system/host.rs

//! Real-host implementation of [`SystemOps`]
//!
//! Shells out to the target distribution's tools: `dpkg-query`/`apt-get`
//! for packages, `systemctl` for services, `pg_dropcluster`/
//! `pg_createcluster` for PostgreSQL clusters, `psql`/`mysql` for dump
//! import, `tar`/`cp`/`chown` for bulk filesystem work.

use super::{Engine, ImportResult, SystemOps};
use crate::error::{Error, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tracing::{debug, warn};

/// [`SystemOps`] backed by the target host's real tools
#[derive(Debug, Default)]
pub struct HostSystem;

impl HostSystem {
    pub fn new() -> Self {
        Self
    }

    fn run(tool: &str, args: &[&str]) -> Result<Output> {
        debug!("Running: {} {}", tool, args.join(" "));
        Command::new(tool)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::Tool { tool: tool.to_string(), source: e })
    }

    fn run_checked(tool: &str, args: &[&str]) -> Result<()> {
        let output = Self::run(tool, args)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(Error::ToolFailed {
                tool: tool.to_string(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl SystemOps for HostSystem {
    fn query_installed(&self, package: &str) -> bool {
        // dpkg-query exits nonzero for unknown packages; only an explicit
        // "install ok installed" status counts.
        match Self::run("dpkg-query", &["-W", "-f", "${Status}", package]) {
            Ok(output) => {
                output.status.success()
                    && String::from_utf8_lossy(&output.stdout).contains("install ok installed")
            }
            Err(e) => {
                warn!("dpkg-query unavailable: {}", e);
                false
            }
        }
    }

    fn install_package(&self, package: &str) -> Result<()> {
        Self::run_checked(
            "apt-get",
            &["install", "-y", "--no-install-recommends", package],
        )
    }

    fn service_enable_start(&self, unit: &str) -> Result<()> {
        Self::run_checked("systemctl", &["enable", "--now", unit])
    }

    fn service_is_active(&self, unit: &str) -> bool {
        match Self::run("systemctl", &["is-active", "--quiet", unit]) {
            Ok(output) => output.status.success(),
            Err(e) => {
                warn!("systemctl unavailable: {}", e);
                false
            }
        }
    }

    fn service_stop(&self, unit: &str) -> Result<()> {
        Self::run_checked("systemctl", &["stop", unit])
    }

    fn socket_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn pg_version_dir(&self, data_root: &Path) -> Option<String> {
        let mut entries: Vec<String> = std::fs::read_dir(data_root)
            .ok()?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        entries.sort();
        entries.into_iter().next()
    }

    fn drop_cluster(&self, version: &str) {
        if let Err(e) = Self::run_checked("pg_dropcluster", &["--stop", version, "main"]) {
            debug!("pg_dropcluster {} main failed (ignored): {}", version, e);
        }
    }

    fn delete_cluster_dir(&self, data_root: &Path, version: &str) {
        let dir = data_root.join(version);
        if let Err(e) = std::fs::remove_dir_all(&dir) {
            debug!("Could not remove {} (ignored): {}", dir.display(), e);
        }
    }

    fn create_cluster(&self, version: &str) -> Result<()> {
        Self::run_checked("pg_createcluster", &[version, "main"])
    }

    fn import_dump(&self, engine: Engine, dump: &Path) -> Result<ImportResult> {
        let output = match engine {
            Engine::Postgres => {
                let dump_arg = dump.to_string_lossy();
                Self::run(
                    "sudo",
                    &["-u", "postgres", "psql", "-f", dump_arg.as_ref(), "postgres"],
                )?
            }
            Engine::MySql => {
                let file = File::open(dump).map_err(|_| Error::MissingInput(dump.to_path_buf()))?;
                debug!("Running: mysql < {}", dump.display());
                Command::new("mysql")
                    .stdin(Stdio::from(file))
                    .output()
                    .map_err(|e| Error::Tool { tool: "mysql".to_string(), source: e })?
            }
        };
        Ok(ImportResult {
            success: output.status.success(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    fn create_archive(&self, archive: &Path, paths: &[PathBuf], excludes: &[String]) -> Result<()> {
        let archive_arg = archive.to_string_lossy().to_string();
        let mut args: Vec<String> = vec!["czf".to_string(), archive_arg, "-C".to_string(), "/".to_string()];
        for exclude in excludes {
            args.push(format!("--exclude={}", exclude.trim_start_matches('/')));
        }
        for path in paths {
            // Members are stored relative to / so extraction is relocatable
            let rel = path.to_string_lossy().trim_start_matches('/').to_string();
            if !rel.is_empty() {
                args.push(rel);
            }
        }
        let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
        Self::run_checked("tar", &arg_refs)
    }

    fn extract_archive(&self, archive: &Path, dest: &Path) -> Result<()> {
        std::fs::create_dir_all(dest)?;
        let archive_arg = archive.to_string_lossy();
        let dest_arg = dest.to_string_lossy();
        Self::run_checked("tar", &["xzf", archive_arg.as_ref(), "-C", dest_arg.as_ref()])
    }

    fn copy_tree(&self, src: &Path, dest: &Path) -> Result<()> {
        std::fs::create_dir_all(dest)?;
        let src_arg = format!("{}/.", src.display());
        let dest_arg = dest.to_string_lossy();
        Self::run_checked("cp", &["-a", src_arg.as_str(), dest_arg.as_ref()])
    }

    fn chown_tree(&self, owner: &str, path: &Path) -> Result<()> {
        let path_arg = path.to_string_lossy();
        Self::run_checked("chown", &["-R", owner, path_arg.as_ref()])
    }

    fn available_space(&self, path: &Path) -> Result<u64> {
        fs2::available_space(path).map_err(Error::Io)
    }
}
