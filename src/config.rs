//! Application configuration management.
//!
//! This module handles loading and saving the crate configuration, which
//! includes the credential service base URL and the last used user id.
//!
//! Configuration is stored at `~/.config/authgate/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "authgate";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the configured service URL
const SERVICE_URL_ENV: &str = "AUTHGATE_SERVICE_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub service_url: Option<String>,
    pub last_user_id: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Service base URL, with the environment variable taking precedence
    /// over the config file.
    pub fn effective_service_url(&self) -> Option<String> {
        std::env::var(SERVICE_URL_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.service_url.clone())
    }

    /// Directory where `FileTokenStore` keeps its data.
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}
