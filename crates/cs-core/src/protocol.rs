//! Wire format between the agent and the store service.
//!
//! Shared by the client transport and the web service so both sides agree
//! on the JSON bodies by construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /clipboard`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishRequest {
    pub content: String,
    pub device_id: String,
}

/// Success body of `POST /clipboard`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishAck {
    pub status: String,
    pub id: i64,
}

impl PublishAck {
    pub fn success(id: i64) -> Self {
        Self {
            status: "success".to_string(),
            id,
        }
    }
}

/// A stored clipboard record, as returned by the latest and history
/// endpoints. `id` reflects arrival order at the store; `timestamp` is
/// informational only and may be skewed across devices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub id: i64,
    pub content: String,
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
}
