//! # cs-app
//!
//! The sync engine and the wiring that assembles it.

pub mod adapters;
pub mod builder;
pub mod engine;

pub use builder::{local_device_id, SyncEngineBuilder};
pub use engine::{SyncEngine, SyncEngineHandle};
