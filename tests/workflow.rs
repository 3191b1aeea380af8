// tests/workflow.rs

//! End-to-end migration workflow against a scripted host: analyze,
//! install packages, restore and import, summarize, rollback.

use crossgrade::commands;
use crossgrade::system::{Engine, ImportResult, SystemOps};
use crossgrade::{
    EngineState, ImportOutcome, InventoryReport, MigrationConfig, MigrationSummary,
    PackageAction, PackageMapping,
};
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scripted target host: package installs succeed, services come up,
/// the PostgreSQL socket is present, imports succeed.
struct ScriptedHost {
    installed: RefCell<HashSet<String>>,
    active: RefCell<HashSet<String>>,
    socket_present: bool,
    mysql_import: (bool, String),
    calls: RefCell<Vec<String>>,
}

impl ScriptedHost {
    fn healthy() -> Self {
        Self {
            installed: RefCell::new(HashSet::new()),
            active: RefCell::new(HashSet::new()),
            socket_present: true,
            mysql_import: (true, String::new()),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl SystemOps for ScriptedHost {
    fn query_installed(&self, package: &str) -> bool {
        self.installed.borrow().contains(package)
    }
    fn install_package(&self, package: &str) -> crossgrade::Result<()> {
        self.calls.borrow_mut().push(format!("install:{}", package));
        self.installed.borrow_mut().insert(package.to_string());
        Ok(())
    }
    fn service_enable_start(&self, unit: &str) -> crossgrade::Result<()> {
        self.calls.borrow_mut().push(format!("enable:{}", unit));
        self.active.borrow_mut().insert(unit.to_string());
        Ok(())
    }
    fn service_is_active(&self, unit: &str) -> bool {
        self.active.borrow().contains(unit)
    }
    fn service_stop(&self, unit: &str) -> crossgrade::Result<()> {
        self.active.borrow_mut().remove(unit);
        Ok(())
    }
    fn socket_exists(&self, _path: &Path) -> bool {
        self.socket_present
    }
    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }
    fn pg_version_dir(&self, _data_root: &Path) -> Option<String> {
        Some("15".to_string())
    }
    fn drop_cluster(&self, _version: &str) {}
    fn delete_cluster_dir(&self, _data_root: &Path, _version: &str) {}
    fn create_cluster(&self, _version: &str) -> crossgrade::Result<()> {
        Ok(())
    }
    fn import_dump(&self, engine: Engine, _dump: &Path) -> crossgrade::Result<ImportResult> {
        self.calls.borrow_mut().push(format!("import:{}", engine));
        let (success, stderr) = match engine {
            Engine::Postgres => (true, String::new()),
            Engine::MySql => self.mysql_import.clone(),
        };
        Ok(ImportResult { success, stderr })
    }
    fn create_archive(
        &self,
        archive: &Path,
        _paths: &[PathBuf],
        _excludes: &[String],
    ) -> crossgrade::Result<()> {
        std::fs::write(archive, b"archive")?;
        Ok(())
    }
    fn extract_archive(&self, _archive: &Path, dest: &Path) -> crossgrade::Result<()> {
        // Simulate a bundle carrying a web root
        std::fs::create_dir_all(dest.join("var/www/html"))?;
        std::fs::write(dest.join("var/www/html/index.html"), b"<html/>")?;
        Ok(())
    }
    fn copy_tree(&self, src: &Path, _dest: &Path) -> crossgrade::Result<()> {
        self.calls.borrow_mut().push(format!("copy:{}", src.display()));
        Ok(())
    }
    fn chown_tree(&self, _owner: &str, _path: &Path) -> crossgrade::Result<()> {
        Ok(())
    }
    fn available_space(&self, _path: &Path) -> crossgrade::Result<u64> {
        Ok(u64::MAX)
    }
}

fn test_setup(inventory: &[&str]) -> (TempDir, MigrationConfig) {
    let dir = TempDir::new().unwrap();
    let mut config = MigrationConfig::default();
    config.work_dir = dir.path().to_path_buf();
    config.inventory_report = dir.path().join("inventory-report.txt");
    config.source_archive = dir.path().join("source-bundle.tar.gz");
    config.pg_dump = dir.path().join("postgres-all.sql");
    config.mysql_dump = dir.path().join("mysql-all.sql");
    config.backup_dir = dir.path().join("backups");
    config.restore_log = dir.path().join("restore.log");
    config.summary_path = dir.path().join("summary.txt");
    config.staging_dir = dir.path().join("staging");
    config.web_root = dir.path().join("www");
    config.home_root = dir.path().join("home");
    config.settle_interval_secs = 0;
    config.settle_max_attempts = 2;

    std::fs::write(&config.inventory_report, inventory.join("\n")).unwrap();
    (dir, config)
}

#[test]
fn full_target_host_pass_on_a_healthy_host() {
    let (_dir, config) = test_setup(&[
        "### packages",
        "httpd-2.4.57-5.el9.x86_64",
        "postgresql-server-13.11-1.el9.x86_64",
        "mariadb-server-10.5.22-1.el9.x86_64",
    ]);
    let sys = ScriptedHost::healthy();

    // Artifacts transferred from the source host
    std::fs::write(&config.source_archive, b"bundle").unwrap();
    std::fs::write(&config.pg_dump, b"-- pg dump").unwrap();
    std::fs::write(&config.mysql_dump, b"-- mysql dump").unwrap();

    let plan = commands::cmd_install_packages(&config, &sys).unwrap();
    let apache = plan.iter().find(|r| r.target == "apache2").unwrap();
    assert_eq!(apache.action, PackageAction::Installed);

    let engines = commands::cmd_restore_and_import(&config, &sys).unwrap();
    assert_eq!(engines.len(), 2);
    assert!(engines.iter().all(|e| e.outcome == ImportOutcome::Success));
    assert_eq!(engines[0].state, EngineState::ServiceActiveWithSocket);

    // Second package pass is a no-op: everything already installed
    let second = commands::cmd_install_packages(&config, &sys).unwrap();
    for row in second.iter().filter(|r| r.action != PackageAction::Skipped) {
        assert_eq!(row.action, PackageAction::AlreadyInstalled, "{}", row.target);
    }

    // Restore log recorded the run
    let log = std::fs::read_to_string(&config.restore_log).unwrap();
    assert!(log.contains("apache2"));
    assert!(log.contains("bundle extracted"));

    commands::cmd_summarize(&config, &plan, &engines).unwrap();
    let summary = std::fs::read_to_string(&config.summary_path).unwrap();
    assert!(summary.contains("PostgreSQL"));
    assert!(summary.contains("success"));
}

#[test]
fn missing_bundle_aborts_restore_before_extraction() {
    let (_dir, config) = test_setup(&["httpd-2.4.57-5.el9.x86_64"]);
    let sys = ScriptedHost::healthy();

    let err = commands::cmd_restore_and_import(&config, &sys).unwrap_err();
    assert!(err.to_string().contains("missing required input file"));
    assert!(sys.calls.borrow().iter().all(|c| !c.starts_with("copy:")));
}

#[test]
fn mysql_conflict_noise_is_reported_as_acceptable() {
    let (_dir, config) = test_setup(&[
        "### packages",
        "mariadb-server-10.5.22-1.el9.x86_64",
    ]);
    let mut sys = ScriptedHost::healthy();
    sys.mysql_import = (
        false,
        "ERROR 1050 (42S01) at line 31: Table 'user' already exists".to_string(),
    );

    std::fs::write(&config.source_archive, b"bundle").unwrap();
    std::fs::write(&config.mysql_dump, b"-- mysql dump").unwrap();

    let engines = commands::cmd_restore_and_import(&config, &sys).unwrap();
    let mysql = engines.iter().find(|e| e.engine == Engine::MySql).unwrap();
    assert_eq!(mysql.outcome, ImportOutcome::FailedSystemConflict);

    let postgres = engines.iter().find(|e| e.engine == Engine::Postgres).unwrap();
    assert_eq!(postgres.state, EngineState::NotDetected);
    assert_eq!(postgres.outcome, ImportOutcome::NotAttempted);
}

#[test]
fn backup_then_rollback_uses_the_created_archive() {
    let (_dir, config) = test_setup(&["httpd-2.4.57"]);
    let sys = ScriptedHost::healthy();

    commands::cmd_backup(&config, &sys).unwrap();
    commands::cmd_rollback(&config, &sys).unwrap();

    let log = std::fs::read_to_string(&config.restore_log).unwrap();
    assert!(log.contains("backup created"));
    assert!(log.contains("rollback applied"));
}

#[test]
fn rollback_with_no_backup_is_a_reported_failure() {
    let (_dir, config) = test_setup(&["httpd-2.4.57"]);
    let sys = ScriptedHost::healthy();

    assert!(commands::cmd_rollback(&config, &sys).is_err());
    let log = std::fs::read_to_string(&config.restore_log).unwrap();
    assert!(log.contains("rollback FAILED"));
}

#[test]
fn summary_reflects_inventory_facts_without_reconciler_runs() {
    let (_dir, config) = test_setup(&["### packages", "vsftpd-3.0.5-4.el9.x86_64"]);

    let report = InventoryReport::load(&config.inventory_report).unwrap();
    let mapping = PackageMapping::builtin();
    let summary = MigrationSummary {
        report: &report,
        mapping: &mapping,
        packages: &[],
        engines: &[],
    };
    let text = summary.render();
    assert!(text.contains("vsftpd"));
    assert!(text.contains("(not run)"));
}
