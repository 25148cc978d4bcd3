//! Exponential backoff for the engine's network-touching operations.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Operation class tracked by [`BackoffPolicy`]. Each class backs off
/// independently: a failing publish path must not slow down a healthy pull
/// path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpClass {
    Publish,
    Pull,
}

impl OpClass {
    pub fn as_str(self) -> &'static str {
        match self {
            OpClass::Publish => "publish",
            OpClass::Pull => "pull",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Wait after the first failure, in seconds; doubles per failure.
    pub base_secs: u64,
    /// Upper bound on the computed wait.
    pub cap: Duration,
    /// A failure older than this no longer counts toward the streak.
    pub staleness: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_secs: 2,
            cap: Duration::from_secs(30),
            staleness: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
struct FailureWindow {
    failures: u32,
    last_failure: Instant,
}

/// Per-operation-class consecutive-failure tracking.
///
/// `on_failure` returns `min(base^failures, cap)`; `on_success` resets the
/// streak. Consulted, never bypassed, by every network call in the engine.
#[derive(Debug)]
pub struct BackoffPolicy {
    config: BackoffConfig,
    windows: HashMap<OpClass, FailureWindow>,
}

impl BackoffPolicy {
    pub fn new(config: BackoffConfig) -> Self {
        Self {
            config,
            windows: HashMap::new(),
        }
    }

    /// Record a failure and return how long the caller should wait before
    /// its next attempt.
    pub fn on_failure(&mut self, class: OpClass) -> Duration {
        self.on_failure_at(class, Instant::now())
    }

    /// Time-injectable variant of [`on_failure`](Self::on_failure).
    pub fn on_failure_at(&mut self, class: OpClass, now: Instant) -> Duration {
        let window = self.windows.entry(class).or_insert(FailureWindow {
            failures: 0,
            last_failure: now,
        });

        // An isolated old failure must not poison this streak.
        if now.duration_since(window.last_failure) > self.config.staleness {
            window.failures = 0;
        }
        window.failures = window.failures.saturating_add(1);
        window.last_failure = now;

        // Bound the exponent before pow; the cap dominates far earlier.
        let exp = window.failures.min(32);
        Duration::from_secs(self.config.base_secs.saturating_pow(exp)).min(self.config.cap)
    }

    /// A successful operation clears the streak for its class.
    pub fn on_success(&mut self, class: OpClass) {
        self.windows.remove(&class);
    }

    pub fn consecutive_failures(&self, class: OpClass) -> u32 {
        self.windows.get(&class).map_or(0, |w| w.failures)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(BackoffConfig::default())
    }
}
