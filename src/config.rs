//! Configuration loading for whatsrelay.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Get the whatsrelay home directory (~/.whatsrelay).
pub fn get_home_dir() -> Result<PathBuf> {
    let home = directories::UserDirs::new()
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

    Ok(home.home_dir().join(".whatsrelay"))
}

/// Get the settings file path.
pub fn get_settings_path() -> Result<PathBuf> {
    Ok(get_home_dir()?.join("settings.json"))
}

/// Load settings from ~/.whatsrelay/settings.json
pub fn load_settings() -> Result<Settings> {
    let path = get_settings_path()?;

    if !path.exists() {
        return Err(Error::Config(format!(
            "Settings file not found at {}. Run 'whatsrelay setup' first.",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(&path)?;
    let settings: Settings = serde_json::from_str(&content)?;

    tracing::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Load settings or return defaults if not found.
pub fn load_settings_or_default() -> Settings {
    load_settings().unwrap_or_else(|e| {
        tracing::warn!("Failed to load settings: {}, using defaults", e);
        Settings::default()
    })
}

/// Write settings to disk, creating the home directory if needed.
pub fn save_settings(settings: &Settings) -> Result<()> {
    let path = get_settings_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(&path, content)?;
    tracing::info!("Saved settings to {}", path.display());
    Ok(())
}

/// Web server configuration.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Server {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Registration configuration.
///
/// The provisioning secret gates `/register`; the `REGISTER_SECRET`
/// environment variable takes precedence over the stored value.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Registration {
    pub secret: Option<String>,
}

impl Registration {
    pub fn resolve_secret(&self) -> Option<String> {
        if let Ok(value) = std::env::var("REGISTER_SECRET") {
            if !value.trim().is_empty() {
                return Some(value);
            }
        }
        self.secret.clone()
    }
}

/// Provider model configuration.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ProviderModel {
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

/// Models configuration.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Models {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub cohere: ProviderModel,
}

fn default_provider() -> String {
    "cohere".to_string()
}

impl Default for Models {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            cohere: ProviderModel::default(),
        }
    }
}

/// whatsrelay settings.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: Server,

    #[serde(default)]
    pub registration: Registration,

    #[serde(default)]
    pub models: Models,
}

impl Settings {
    /// Directory holding per-user messaging session artifacts.
    pub fn sessions_dir(&self) -> Result<PathBuf> {
        Ok(get_home_dir()?.join("sessions"))
    }

    /// Path of the credential store snapshot.
    pub fn users_path(&self) -> Result<PathBuf> {
        Ok(get_home_dir()?.join("users.json"))
    }

    /// Path of the message ledger snapshot.
    pub fn ledger_path(&self) -> Result<PathBuf> {
        Ok(get_home_dir()?.join("messages.json"))
    }

    /// Path of the AI reply log snapshot.
    pub fn replies_path(&self) -> Result<PathBuf> {
        Ok(get_home_dir()?.join("ai-replies.json"))
    }
}
