//! # cs-core
//!
//! Core domain models and business logic for clipsync.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod backoff;
pub mod config;
pub mod device;
pub mod error;
pub mod ports;
pub mod protocol;

// Re-export commonly used types at the crate root
pub use backoff::{BackoffConfig, BackoffPolicy, OpClass};
pub use config::SyncTuning;
pub use device::{compute_device_id, DeviceId};
pub use error::SyncError;
pub use protocol::{PublishAck, PublishRequest, RemoteRecord};
