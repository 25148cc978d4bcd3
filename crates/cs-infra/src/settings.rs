//! User settings: a JSON file in the platform config directory, with
//! environment overrides for deployments that never touch the file.

use anyhow::{anyhow, Context, Result};
use cs_core::config::SyncTuning;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const SETTINGS_FILE: &str = "settings.json";
const DATABASE_FILE: &str = "clipsync.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// Base URL of the store service the agent talks to.
    pub server_url: String,

    /// Port the web service binds to (server mode).
    pub webserver_port: u16,

    /// Device id whose stream the pull loop follows. Defaults to this
    /// device's own id when unset.
    pub watch_device: Option<String>,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5001".to_string(),
            webserver_port: 5001,
            watch_device: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite database path. Defaults to `clipsync.db` in the config dir.
    pub database_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub sync: SyncTuning,
    #[serde(default)]
    pub network: NetworkSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

impl Settings {
    /// Load settings from `path`, or from the default location when `None`.
    ///
    /// A missing file yields defaults; an unreadable or unparseable file is
    /// an error, as are malformed environment overrides — configuration
    /// problems at startup are the one fatal error class.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => default_settings_path()?,
        };

        let mut settings = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read settings file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse settings file {}", path.display()))?
        } else {
            Settings::default()
        };

        settings.apply_env_overrides()?;
        Ok(settings)
    }

    /// Persist settings to `path`, or to the default location when `None`.
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let path = match path {
            Some(path) => path,
            None => default_settings_path()?,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config dir {}", parent.display()))?;
        }

        let raw = serde_json::to_string_pretty(self).context("failed to serialize settings")?;
        fs::write(&path, raw)
            .with_context(|| format!("failed to write settings file {}", path.display()))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("SERVER_URL") {
            self.network.server_url = url;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.network.webserver_port = port
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {:?}", port))?;
        }
        if let Ok(db) = std::env::var("DATABASE_URL") {
            self.storage.database_path = Some(PathBuf::from(db));
        }
        if let Ok(device) = std::env::var("CLIPSYNC_WATCH_DEVICE") {
            self.network.watch_device = Some(device);
        }
        Ok(())
    }

    /// Path of the SQLite database, as a diesel database URL.
    pub fn database_url(&self) -> Result<String> {
        let path = match &self.storage.database_path {
            Some(path) => path.clone(),
            None => default_config_dir()?.join(DATABASE_FILE),
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create data dir {}", parent.display()))?;
        }
        path.to_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("database path is not valid UTF-8: {}", path.display()))
    }
}

/// Platform config directory for clipsync.
pub fn default_config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("platform config directory is unavailable")?;
    Ok(base.join("clipsync"))
}

fn default_settings_path() -> Result<PathBuf> {
    Ok(default_config_dir()?.join(SETTINGS_FILE))
}
