// src/menu.rs

//! Interactive menu for the target host
//!
//! A numbered dispatch loop over the same handlers the subcommands use.
//! Actions are independently invocable any number of times in any order;
//! the only state kept across actions is this session's reconciler results,
//! so that "summarize" can report what the session actually did.

use crate::commands;
use crate::config::MigrationConfig;
use crate::reconcile::database::EngineReport;
use crate::reconcile::packages::PackagePlan;
use crate::system::SystemOps;
use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::warn;

const MENU: &str = "\
crossgrade: target host migration
  1) analyze inventory report
  2) check disk space
  3) back up this host
  4) install mapped packages
  5) restore bundle and import databases
  6) fix file ownership
  7) enable services
  8) verify migration
  9) write summary
 10) rollback to last backup
 11) exit
";

/// Run the interactive menu until the operator exits
pub fn run(config: &MigrationConfig, sys: &dyn SystemOps) -> Result<()> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut packages: Vec<PackagePlan> = Vec::new();
    let mut engines: Vec<EngineReport> = Vec::new();

    loop {
        print!("{}\nSelect action [1-11]: ", MENU);
        std::io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // EOF behaves like exit
            return Ok(());
        }

        let result = match line.trim() {
            "1" => commands::cmd_analyze(config),
            "2" => commands::cmd_check_space(config, sys),
            "3" => commands::cmd_backup(config, sys),
            "4" => commands::cmd_install_packages(config, sys).map(|plan| {
                packages = plan;
            }),
            "5" => commands::cmd_restore_and_import(config, sys).map(|reports| {
                engines = reports;
            }),
            "6" => commands::cmd_fix_permissions(config, sys),
            "7" => commands::cmd_enable_services(config, sys),
            "8" => commands::cmd_verify(config, sys),
            "9" => commands::cmd_summarize(config, &packages, &engines),
            "10" => commands::cmd_rollback(config, sys),
            "11" | "q" | "quit" | "exit" => return Ok(()),
            other => {
                println!("Unknown selection: {:?}", other);
                continue;
            }
        };

        // An action's failure is reported and the menu continues; nothing
        // unwinds across action boundaries.
        if let Err(e) = result {
            warn!("Action failed: {:#}", e);
            println!("Action failed: {:#}", e);
        }
        println!();
    }
}
