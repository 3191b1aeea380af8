// src/cli.rs
//! CLI definitions for the crossgrade toolkit
//!
//! Every interactive menu action is also a plain subcommand, so the whole
//! migration can be driven non-interactively. The command implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crossgrade")]
#[command(version)]
#[command(about = "Migrate a host between Linux distribution families", long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file (built-in defaults if omitted)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive target-host menu (default)
    Menu,

    /// On the source host: capture inventory, dump databases, bundle files
    Collect {
        /// Target hostname; prints the transfer command when given
        #[arg(long)]
        target_host: Option<String>,
    },

    /// Show what the source inventory implies for this target
    Analyze,

    /// Check free disk space against the configured minimum
    CheckSpace,

    /// Archive this host's configuration and data before mutating anything
    Backup,

    /// Install target packages mapped from the source inventory
    InstallPackages,

    /// Extract the bundle, restore files, and import database dumps
    Restore,

    /// Re-apply ownership to restored trees
    FixPermissions,

    /// Enable and start target services for what the source ran
    EnableServices,

    /// Verify tools, packages, and services on the migrated host
    Verify,

    /// Write the migration summary artifact
    Summarize,

    /// Restore this host from its newest self-backup
    Rollback,
}
