//! The synchronization engine: two long-lived loops over one state owner.
//!
//! The publish loop pushes genuine local clipboard changes to the store;
//! the pull loop applies the store's newest value locally. Both loops share
//! [`EngineState`] behind a single mutex so neither can observe the other
//! mid-update — the interleaving hazard that would otherwise let a value
//! pulled from the store be re-detected as a fresh local edit and bounce
//! between the loops forever.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use cs_core::backoff::{BackoffPolicy, OpClass};
use cs_core::config::SyncTuning;
use cs_core::device::DeviceId;
use cs_core::error::SyncError;
use cs_core::ports::{LocalClipboardPort, SyncTransport};

/// Shared engine state. Mutated by both loops; every decision-and-update
/// sequence runs under the one lock.
#[derive(Default)]
struct EngineState {
    /// Last local value the publish loop accounted for.
    last_observed_local: String,
    /// Last value that arrived via the pull loop. Publishing it again would
    /// echo it back to the store.
    last_synced_remote: String,
    /// Consecutive-failure accounting per operation class.
    backoff: BackoffPolicy,
}

/// Whether an iteration actually exercised the network.
#[derive(Debug)]
enum Tick {
    /// A network call completed successfully; the failure streak resets.
    Synced,
    /// Nothing to do this round; no network call was made.
    Skipped,
}

pub struct SyncEngine {
    device_id: DeviceId,
    /// Device whose stream the pull loop follows.
    watch_device_id: DeviceId,
    clipboard: Arc<dyn LocalClipboardPort>,
    transport: Arc<dyn SyncTransport>,
    tuning: SyncTuning,
    state: Mutex<EngineState>,
    shutdown: CancellationToken,
}

/// Join handles for the two loops.
pub struct SyncEngineHandle {
    publish: JoinHandle<()>,
    pull: JoinHandle<()>,
}

impl SyncEngineHandle {
    /// Wait for both loops to finish after [`SyncEngine::stop`].
    pub async fn join(self) {
        let _ = self.publish.await;
        let _ = self.pull.await;
    }
}

impl SyncEngine {
    pub fn new(
        device_id: DeviceId,
        watch_device_id: Option<DeviceId>,
        clipboard: Arc<dyn LocalClipboardPort>,
        transport: Arc<dyn SyncTransport>,
        tuning: SyncTuning,
    ) -> Self {
        let backoff = BackoffPolicy::new(tuning.backoff_config());
        Self {
            watch_device_id: watch_device_id.unwrap_or_else(|| device_id.clone()),
            device_id,
            clipboard,
            transport,
            tuning,
            state: Mutex::new(EngineState {
                backoff,
                ..EngineState::default()
            }),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Spawn the publish and pull loops. They run until [`stop`] is called
    /// or the process terminates.
    ///
    /// [`stop`]: Self::stop
    pub fn start(self: Arc<Self>) -> SyncEngineHandle {
        info!(
            device_id = %self.device_id,
            watch_device_id = %self.watch_device_id,
            "starting sync engine"
        );

        let publish = {
            let engine = Arc::clone(&self);
            tokio::spawn(async move { engine.publish_loop().await })
        };
        let pull = {
            let engine = self;
            tokio::spawn(async move { engine.pull_loop().await })
        };

        SyncEngineHandle { publish, pull }
    }

    /// Signal both loops to stop after their current iteration.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    async fn publish_loop(&self) {
        // Seed with the content present at startup so it is not treated as
        // a fresh edit.
        if let Ok(initial) = self.clipboard.read_text() {
            self.state.lock().await.last_observed_local = initial;
        }

        loop {
            let delay = match self.publish_tick().await {
                Ok(Tick::Synced) => {
                    self.state.lock().await.backoff.on_success(OpClass::Publish);
                    self.tuning.publish_interval()
                }
                Ok(Tick::Skipped) => self.tuning.publish_interval(),
                // The backoff wait replaces the tick interval.
                Err(err) => self.back_off(OpClass::Publish, &err).await,
            };
            if self.wait(delay).await {
                break;
            }
        }
        debug!("publish loop stopped");
    }

    async fn pull_loop(&self) {
        loop {
            let delay = match self.pull_tick().await {
                Ok(Tick::Synced) => {
                    self.state.lock().await.backoff.on_success(OpClass::Pull);
                    self.tuning.pull_interval()
                }
                Ok(Tick::Skipped) => self.tuning.pull_interval(),
                Err(err) => self.back_off(OpClass::Pull, &err).await,
            };
            if self.wait(delay).await {
                break;
            }
        }
        debug!("pull loop stopped");
    }

    /// One publish iteration: detect a genuine local change and push it.
    async fn publish_tick(&self) -> Result<Tick, SyncError> {
        let current = match self.clipboard.read_text() {
            Ok(text) => text,
            Err(err) => {
                // Clipboard trouble is not a network failure: log it and
                // try again on the next tick.
                warn!(error = %err, "failed to read local clipboard");
                return Ok(Tick::Skipped);
            }
        };
        if current.trim().is_empty() {
            return Ok(Tick::Skipped);
        }

        let mut state = self.state.lock().await;
        if current == state.last_observed_local {
            return Ok(Tick::Skipped);
        }
        if current == state.last_synced_remote {
            // The value arrived through the pull loop; treating it as a
            // local edit would start a publish/pull oscillation.
            debug!("suppressing echo of remotely synced content");
            state.last_observed_local = current;
            return Ok(Tick::Skipped);
        }

        // The lock stays held across the call; the transport timeout bounds
        // how long the pull loop can be kept out of the state.
        match self.transport.publish(&self.device_id, &current).await {
            Ok(id) => {
                info!(id, bytes = current.len(), "published local clipboard change");
                state.last_observed_local = current;
                Ok(Tick::Synced)
            }
            Err(SyncError::Validation(detail)) => {
                // Never retried; mark the value observed so it cannot wedge
                // the loop.
                warn!(detail = %detail, "store rejected clipboard content");
                state.last_observed_local = current;
                Ok(Tick::Skipped)
            }
            Err(err) => Err(err),
        }
    }

    /// One pull iteration: apply the store's newest value locally.
    async fn pull_tick(&self) -> Result<Tick, SyncError> {
        let current = match self.clipboard.read_text() {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "failed to read local clipboard");
                return Ok(Tick::Skipped);
            }
        };

        let Some(remote) = self.transport.fetch_latest(&self.watch_device_id).await? else {
            // No record yet for the watched device; nothing to sync.
            return Ok(Tick::Synced);
        };

        let mut state = self.state.lock().await;
        if remote.content == current {
            // Already in sync; still remember the value so the publish loop
            // recognizes it as remote.
            state.last_synced_remote = remote.content;
            return Ok(Tick::Synced);
        }

        if let Err(err) = self.clipboard.write_text(&remote.content) {
            warn!(error = %err, "failed to write remote content to local clipboard");
            return Ok(Tick::Synced);
        }
        // Both fields move together: the publish loop must never see the
        // remote value with only one of them updated.
        state.last_observed_local = remote.content.clone();
        state.last_synced_remote = remote.content;
        info!(
            id = remote.id,
            origin = %remote.device_id,
            "applied remote clipboard content"
        );
        Ok(Tick::Synced)
    }

    async fn back_off(&self, class: OpClass, err: &SyncError) -> Duration {
        let mut state = self.state.lock().await;
        let wait = state.backoff.on_failure(class);
        let failures = state.backoff.consecutive_failures(class);
        drop(state);

        match err {
            SyncError::MalformedResponse(detail) => warn!(
                op = class.as_str(),
                failures,
                wait_secs = wait.as_secs(),
                detail = %detail,
                "server response had unexpected shape; backing off"
            ),
            _ => warn!(
                op = class.as_str(),
                failures,
                wait_secs = wait.as_secs(),
                error = %err,
                "operation failed; backing off"
            ),
        }
        wait
    }

    /// Sleep `delay`, returning true when shutdown fired instead.
    async fn wait(&self, delay: Duration) -> bool {
        tokio::select! {
            _ = self.shutdown.cancelled() => true,
            _ = tokio::time::sleep(delay) => false,
        }
    }
}
