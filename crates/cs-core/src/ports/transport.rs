use async_trait::async_trait;

use crate::device::DeviceId;
use crate::error::SyncError;
use crate::protocol::RemoteRecord;

/// Stateless request/response calls against the central store.
///
/// Implementations apply a bounded per-operation timeout so a stalled call
/// cannot block a sync loop indefinitely; a timeout surfaces as
/// [`SyncError::Timeout`].
#[async_trait]
pub trait SyncTransport: Send + Sync {
    /// Publish `content` as the device's newest clipboard value and return
    /// the id the store assigned to it.
    async fn publish(&self, device_id: &DeviceId, content: &str) -> Result<i64, SyncError>;

    /// Fetch the newest record for `device_id`. `Ok(None)` means the device
    /// has no records yet, which is not an error for the pull loop.
    async fn fetch_latest(&self, device_id: &DeviceId)
        -> Result<Option<RemoteRecord>, SyncError>;
}
