use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cs_app::adapters::SystemClipboard;
use cs_app::builder::{local_device_id, SyncEngineBuilder};
use cs_core::device::DeviceId;
use cs_infra::db::pool::init_db_pool;
use cs_infra::settings::Settings;
use cs_infra::store::ClipboardStore;
use cs_network::http_transport::{HttpSyncTransport, HttpTransportConfig};
use cs_server::WebServer;

const USAGE: &str = "usage: clipsync [agent | server | history [device_id]]";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // Configuration problems at startup are the one fatal error class.
    let settings = Settings::load(None).context("failed to load settings")?;

    let mode = env::args().nth(1).unwrap_or_else(|| "agent".to_string());
    match mode.as_str() {
        "agent" => run_agent(settings).await,
        "server" => run_server(settings).await,
        "history" => run_history(settings, env::args().nth(2)).await,
        other => bail!("unknown mode {:?}\n{}", other, USAGE),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Run the store service until ctrl-c.
async fn run_server(settings: Settings) -> Result<()> {
    let database_url = settings.database_url()?;
    let pool = init_db_pool(&database_url)
        .with_context(|| format!("failed to open database {}", database_url))?;
    let store = ClipboardStore::new(pool);

    let addr: SocketAddr = ([0, 0, 0, 0], settings.network.webserver_port).into();
    let server = WebServer::new(addr, store);

    let shutdown = server.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received ctrl-c, shutting down");
            shutdown.cancel();
        }
    });

    server.run().await
}

/// Run the sync agent until ctrl-c.
async fn run_agent(settings: Settings) -> Result<()> {
    let device_id = local_device_id();
    info!(
        device_id = %device_id,
        server_url = %settings.network.server_url,
        "starting clipboard agent"
    );

    let clipboard = Arc::new(SystemClipboard::new()?);
    let transport = Arc::new(HttpSyncTransport::new(HttpTransportConfig::from_tuning(
        &settings.network.server_url,
        &settings.sync,
    ))?);

    let engine = SyncEngineBuilder::new()
        .device_id(device_id)
        .watch_device_id(settings.network.watch_device.clone().map(DeviceId::from))
        .clipboard(clipboard)
        .transport(transport)
        .tuning(settings.sync.clone())
        .build()?;

    let handle = engine.clone().start();

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!("received ctrl-c, stopping sync engine");
    engine.stop();
    handle.join().await;
    Ok(())
}

/// Print recent records from the store, optionally for one device.
async fn run_history(settings: Settings, device: Option<String>) -> Result<()> {
    let transport = HttpSyncTransport::new(HttpTransportConfig::from_tuning(
        &settings.network.server_url,
        &settings.sync,
    ))?;

    let device_id = device.map(DeviceId::from);
    let records = transport.fetch_history(device_id.as_ref(), None).await?;

    if records.is_empty() {
        println!("No clipboard history yet.");
        return Ok(());
    }

    println!("Showing {} most recent records:", records.len());
    for record in &records {
        println!(
            "[{}] {}  {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.device_id,
            record.content
        );
    }
    Ok(())
}
