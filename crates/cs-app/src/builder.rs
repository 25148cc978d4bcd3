//! Assembles a sync engine from settings and ambient host attributes.

use std::env;
use std::sync::Arc;

use anyhow::Result;
use gethostname::gethostname;

use cs_core::config::SyncTuning;
use cs_core::device::{compute_device_id, DeviceId};
use cs_core::ports::{LocalClipboardPort, SyncTransport};

use crate::engine::SyncEngine;

/// Device id for this host.
///
/// An attribute that cannot be read (e.g. a hostname that is not valid
/// UTF-8) falls back to an empty component, so the id is still stable for
/// the session.
pub fn local_device_id() -> DeviceId {
    let hostname = gethostname();
    let hostname = hostname.to_str().unwrap_or_default();
    compute_device_id(env::consts::OS, env::consts::ARCH, hostname)
}

/// Builder for assembling a [`SyncEngine`] from its ports.
pub struct SyncEngineBuilder {
    device_id: Option<DeviceId>,
    watch_device_id: Option<DeviceId>,
    clipboard: Option<Arc<dyn LocalClipboardPort>>,
    transport: Option<Arc<dyn SyncTransport>>,
    tuning: SyncTuning,
}

impl Default for SyncEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncEngineBuilder {
    pub fn new() -> Self {
        Self {
            device_id: None,
            watch_device_id: None,
            clipboard: None,
            transport: None,
            tuning: SyncTuning::default(),
        }
    }

    /// Identity of this device. Defaults to [`local_device_id`].
    pub fn device_id(mut self, device_id: DeviceId) -> Self {
        self.device_id = Some(device_id);
        self
    }

    /// Device whose stream the pull loop follows. `None` means this
    /// device's own stream.
    pub fn watch_device_id(mut self, watch_device_id: Option<DeviceId>) -> Self {
        self.watch_device_id = watch_device_id;
        self
    }

    pub fn clipboard(mut self, clipboard: Arc<dyn LocalClipboardPort>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn SyncTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn tuning(mut self, tuning: SyncTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn build(self) -> Result<Arc<SyncEngine>> {
        let clipboard = self
            .clipboard
            .ok_or_else(|| anyhow::anyhow!("LocalClipboardPort is required"))?;
        let transport = self
            .transport
            .ok_or_else(|| anyhow::anyhow!("SyncTransport is required"))?;

        Ok(Arc::new(SyncEngine::new(
            self.device_id.unwrap_or_else(local_device_id),
            self.watch_device_id,
            clipboard,
            transport,
            self.tuning,
        )))
    }
}
