use crate::errors::{AshramError, AshramResult};
use crate::types::ClientInfo;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Production chat-gita endpoint
pub const DEFAULT_ENDPOINT: &str = "https://samvad.atmavani.life/api/chat-gita";

/// Directory name used under the config and data dirs
pub const APP_NAME: &str = "gita-ashram";

/// Configuration for the guidance client
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AshramConfig {
    pub endpoint: Option<String>,
    pub app_name: Option<String>,
    pub app_version: Option<String>,
    pub mailbox_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Default for AshramConfig {
    fn default() -> Self {
        let client = ClientInfo::default();
        Self {
            endpoint: Some(DEFAULT_ENDPOINT.to_string()),
            app_name: Some(client.app),
            app_version: Some(client.version),
            mailbox_dir: None,
            log_level: Some("warn".to_string()),
        }
    }
}

impl AshramConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> AshramResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                AshramError::ConfigError(format!("Failed to read config file: {}", e))
            })?;

            let config: Self = toml::from_str(&content).map_err(|e| {
                AshramError::ConfigError(format!("Failed to parse config file: {}", e))
            })?;

            // Missing keys in the file fall back to defaults
            Ok(Self::default().merge(&config))
        } else {
            Ok(Self::default())
        }
    }

    /// Saves configuration to a file
    pub fn save_to_file(&self, path: &Path) -> AshramResult<()> {
        let content = toml::to_string(self).map_err(|e| {
            AshramError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AshramError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(path, content).map_err(|e| {
            AshramError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            endpoint: other.endpoint.clone().or_else(|| self.endpoint.clone()),
            app_name: other.app_name.clone().or_else(|| self.app_name.clone()),
            app_version: other
                .app_version
                .clone()
                .or_else(|| self.app_version.clone()),
            mailbox_dir: other
                .mailbox_dir
                .clone()
                .or_else(|| self.mailbox_dir.clone()),
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
        }
    }

    /// Endpoint to post requests to
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Client identification sent with every request
    pub fn client_info(&self) -> ClientInfo {
        let defaults = ClientInfo::default();
        ClientInfo {
            app: self.app_name.clone().unwrap_or(defaults.app),
            version: self.app_version.clone().unwrap_or(defaults.version),
        }
    }

    /// Directory holding the prefill mailbox
    pub fn mailbox_dir(&self) -> AshramResult<PathBuf> {
        match &self.mailbox_dir {
            Some(dir) => Ok(dir.clone()),
            None => get_default_data_dir(),
        }
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir() -> AshramResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        AshramError::ConfigError("Could not determine home directory".to_string())
    })?;

    Ok(home_dir.join(".config").join(APP_NAME))
}

/// Helper function to get default config file path
pub fn get_default_config_file() -> AshramResult<PathBuf> {
    let config_dir = get_default_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Helper function to get the default directory for local state
pub fn get_default_data_dir() -> AshramResult<PathBuf> {
    let data_dir = dirs::data_local_dir().ok_or_else(|| {
        AshramError::ConfigError("Could not determine local data directory".to_string())
    })?;

    Ok(data_dir.join(APP_NAME))
}
