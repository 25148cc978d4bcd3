//! # cs-network
//!
//! HTTP transport implementation of the `SyncTransport` port.

pub mod http_transport;

pub use http_transport::{HttpSyncTransport, HttpTransportConfig};
