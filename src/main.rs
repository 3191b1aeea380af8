// src/main.rs

use anyhow::Result;
use clap::Parser;
use crossgrade::cli::{Cli, Commands};
use crossgrade::{commands, menu, HostSystem, MigrationConfig};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = MigrationConfig::load(cli.config.as_deref())?;
    let sys = HostSystem::new();

    match cli.command {
        None | Some(Commands::Menu) => menu::run(&config, &sys),
        Some(Commands::Collect { target_host }) => {
            commands::cmd_collect(&config, &sys, target_host.as_deref())
        }
        Some(Commands::Analyze) => commands::cmd_analyze(&config),
        Some(Commands::CheckSpace) => commands::cmd_check_space(&config, &sys),
        Some(Commands::Backup) => commands::cmd_backup(&config, &sys),
        Some(Commands::InstallPackages) => {
            commands::cmd_install_packages(&config, &sys).map(|_| ())
        }
        Some(Commands::Restore) => commands::cmd_restore_and_import(&config, &sys).map(|_| ()),
        Some(Commands::FixPermissions) => commands::cmd_fix_permissions(&config, &sys),
        Some(Commands::EnableServices) => commands::cmd_enable_services(&config, &sys),
        Some(Commands::Verify) => commands::cmd_verify(&config, &sys),
        Some(Commands::Summarize) => commands::cmd_summarize(&config, &[], &[]),
        Some(Commands::Rollback) => commands::cmd_rollback(&config, &sys),
    }
}
