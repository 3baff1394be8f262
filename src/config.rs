use crate::api::constants::DEFAULT_ENDPOINT;
use crate::notify::NotificationTimeouts;
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the configured endpoint
pub const ENDPOINT_ENV: &str = "CLINIC_DASHBOARD_ENDPOINT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub offline: OfflineConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_error_timeout_ms")]
    pub error_timeout_ms: u64,
    #[serde(default = "default_success_timeout_ms")]
    pub success_timeout_ms: u64,
    #[serde(default = "default_nav_breakpoint")]
    pub nav_breakpoint: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OfflineConfig {
    /// Directory the offline asset manifest is resolved against
    #[serde(default)]
    pub asset_dir: Option<PathBuf>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_error_timeout_ms() -> u64 {
    5000
}

fn default_success_timeout_ms() -> u64 {
    3000
}

fn default_nav_breakpoint() -> u16 {
    768
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            error_timeout_ms: default_error_timeout_ms(),
            success_timeout_ms: default_success_timeout_ms(),
            nav_breakpoint: default_nav_breakpoint(),
        }
    }
}

impl UiConfig {
    pub fn notification_timeouts(&self) -> NotificationTimeouts {
        NotificationTimeouts {
            error: Duration::from_millis(self.error_timeout_ms),
            success: Duration::from_millis(self.success_timeout_ms),
        }
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("clinic-dashboard")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".clinic-dashboard")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::load_from(&Self::get_config_path()?)?;
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            debug!("Endpoint overridden by {}", ENDPOINT_ENV);
            config.api.endpoint = endpoint;
        }
        Ok(config)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Config = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        debug!("Loaded config with endpoint {}", config.api.endpoint);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", config_path);

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)
                    .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
                info!("Created config directory: {:?}", config_dir);
            }
        }

        let config_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }

    pub fn set_endpoint(&mut self, endpoint: String) -> Result<()> {
        reqwest::Url::parse(&endpoint).with_context(|| format!("Invalid endpoint URL: {}", endpoint))?;
        info!("Setting endpoint to: {}", endpoint);
        self.api.endpoint = endpoint;
        Ok(())
    }
}
