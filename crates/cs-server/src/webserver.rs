use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::info;

use cs_infra::store::ClipboardStore;

use crate::routes;

/// Web server exposing the clipboard store.
///
/// Runs until the shutdown token fires; in-flight requests are drained
/// before `run` returns.
pub struct WebServer {
    addr: SocketAddr,
    store: ClipboardStore,
    shutdown: CancellationToken,
}

impl WebServer {
    pub fn new(addr: SocketAddr, store: ClipboardStore) -> Self {
        Self {
            addr,
            store,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token that stops the server when cancelled.
    pub fn shutdown_handle(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub async fn run(&self) -> Result<()> {
        let routes = routes::all(self.store.clone());
        let shutdown = self.shutdown.clone();

        let (addr, server) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(self.addr, async move {
                shutdown.cancelled().await;
            })
            .with_context(|| format!("failed to bind web server to {}", self.addr))?;

        info!(%addr, "web server listening");
        server.await;
        info!("web server stopped");
        Ok(())
    }
}
