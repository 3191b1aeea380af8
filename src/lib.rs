// src/lib.rs

//! Crossgrade Migration Toolkit
//!
//! Automates moving a host from an RPM-based distribution to a Debian-based
//! one: inventory the source host, bundle configuration and logical database
//! dumps, then on the target host map package names, restore configuration,
//! import the dumps, and verify the result.
//!
//! # Architecture
//!
//! - Inventory-first: all decisions derive from a captured, immutable
//!   inventory report plus live probes of the target host
//! - Collaborators behind one seam: every external tool (apt, systemctl,
//!   tar, psql, mysql) is reached through the [`system::SystemOps`] trait
//! - One forward pass: database reconciliation walks each engine's state
//!   machine once per run, never revisiting a terminal state
//! - Nothing fails silently: every collaborator failure lands in the
//!   restore log and the final summary

pub mod backup;
pub mod cli;
pub mod collect;
pub mod commands;
pub mod config;
mod error;
pub mod inventory;
pub mod journal;
pub mod mapping;
pub mod menu;
pub mod reconcile;
pub mod report;
pub mod system;

pub use config::MigrationConfig;
pub use error::{Error, Result};
pub use inventory::InventoryReport;
pub use journal::Journal;
pub use mapping::{MapEntry, PackageMapping};
pub use reconcile::database::{DatabaseReconciler, EngineReport, EngineState, ImportOutcome};
pub use reconcile::packages::{reconcile_packages, PackageAction, PackagePlan};
pub use report::MigrationSummary;
pub use system::{Engine, HostSystem, ImportResult, SystemOps};
