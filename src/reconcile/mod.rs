// src/reconcile/mod.rs

//! Reconciliation: decide, from observed facts about the source and target
//! hosts, what remedial actions the migration still needs.

pub mod database;
pub mod packages;
