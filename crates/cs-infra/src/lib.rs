//! # cs-infra
//!
//! Persistence and settings infrastructure for clipsync.

pub mod db;
pub mod settings;
pub mod store;

pub use settings::Settings;
pub use store::{ClipboardStore, StoreError};
