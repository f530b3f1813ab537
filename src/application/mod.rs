//! Application layer: the store, reducer registration and state persistence.
//!
//! `register_reducer` is the primary entry point for feature modules. It
//! attaches a reducer synchronously and hands back a future that restores
//! previously persisted state for it.

pub mod persister;
pub mod registrar;
pub mod store;
