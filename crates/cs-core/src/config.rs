//! Engine tuning knobs.

use crate::backoff::BackoffConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing parameters of the sync engine and its transport.
///
/// Intervals are stored as plain integers so the struct can live inside the
/// settings file unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncTuning {
    /// Publish loop tick interval in milliseconds.
    pub publish_interval_ms: u64,
    /// Pull loop tick interval in milliseconds.
    pub pull_interval_ms: u64,
    /// Timeout for fetch (read) requests in milliseconds.
    pub fetch_timeout_ms: u64,
    /// Timeout for publish (write) requests in milliseconds.
    pub publish_timeout_ms: u64,
    /// Backoff wait after the first consecutive failure, in seconds.
    pub backoff_base_secs: u64,
    /// Upper bound on the backoff wait, in seconds.
    pub backoff_cap_secs: u64,
    /// Failure streaks older than this are forgotten, in seconds.
    pub backoff_staleness_secs: u64,
}

impl Default for SyncTuning {
    fn default() -> Self {
        Self {
            publish_interval_ms: 500,
            pull_interval_ms: 2_000,
            fetch_timeout_ms: 3_000,
            publish_timeout_ms: 5_000,
            backoff_base_secs: 2,
            backoff_cap_secs: 30,
            backoff_staleness_secs: 60,
        }
    }
}

impl SyncTuning {
    pub fn publish_interval(&self) -> Duration {
        Duration::from_millis(self.publish_interval_ms)
    }

    pub fn pull_interval(&self) -> Duration {
        Duration::from_millis(self.pull_interval_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn publish_timeout(&self) -> Duration {
        Duration::from_millis(self.publish_timeout_ms)
    }

    pub fn backoff_config(&self) -> BackoffConfig {
        BackoffConfig {
            base_secs: self.backoff_base_secs,
            cap: Duration::from_secs(self.backoff_cap_secs),
            staleness: Duration::from_secs(self.backoff_staleness_secs),
        }
    }
}
