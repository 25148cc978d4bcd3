use thiserror::Error;

/// Failure taxonomy for sync operations.
///
/// Only `Validation` is terminal for the operation that raised it. The
/// transient variants are retried with backoff for as long as the process
/// lives; nothing here is ever fatal.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Malformed or missing required field. Never retried.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Connection-level failure or unexpected HTTP status.
    #[error("network failure: {0}")]
    Network(String),

    /// The bounded per-operation timeout elapsed.
    #[error("request timed out")]
    Timeout,

    /// The server answered, but with an unexpected shape. Backs off like a
    /// network failure; logged distinctly.
    #[error("malformed server response: {0}")]
    MalformedResponse(String),

    /// Local clipboard access failed. The affected loop retries on its
    /// next tick.
    #[error("clipboard access failed: {0}")]
    Clipboard(String),
}

impl SyncError {
    /// Whether the operation should be retried with backoff.
    pub fn is_transient(&self) -> bool {
        !matches!(self, SyncError::Validation(_))
    }
}
