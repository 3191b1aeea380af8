// src/commands/mod.rs
//! Command handlers for the crossgrade CLI
//!
//! One handler per menu action. Handlers own the operator-facing output
//! (`println!`) and the restore-log entries; all host access goes through
//! the [`SystemOps`](crate::system::SystemOps) seam so the underlying logic
//! stays testable without a host.

mod analyze;
mod backup;
mod collect;
mod packages;
mod restore;
mod services;
mod verify;

pub use analyze::cmd_analyze;
pub use backup::{cmd_backup, cmd_check_space, cmd_rollback};
pub use collect::cmd_collect;
pub use packages::cmd_install_packages;
pub use restore::{cmd_fix_permissions, cmd_restore_and_import};
pub use services::cmd_enable_services;
pub use verify::{cmd_summarize, cmd_verify};
