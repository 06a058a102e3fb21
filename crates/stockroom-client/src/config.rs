//! # Client Configuration
//!
//! Configuration of the admin backend connection and editor behaviour.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOCKROOM_API_URL=https://admin.example.com/api                    │
//! │     STOCKROOM_MARGIN_REMOTE=false                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/admin/admin.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.stockroom.admin/admin.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8080/api, remote margin on                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # admin.toml
//! [api]
//! base_url = "http://localhost:8080/api"
//! timeout_secs = 10
//! connect_timeout_secs = 5
//!
//! [margin]
//! remote_enabled = true
//! remote_for_unsaved = false
//!
//! [pricing]
//! zero_clears_paired = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use stockroom_core::PairingPolicy;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// API Settings
// =============================================================================

/// Where the admin backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// TCP connect timeout (seconds).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

// =============================================================================
// Margin Settings
// =============================================================================

/// Which margin strategy the editor prefers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginSettings {
    /// Ask the backend for product-aware margins. When off, margins are
    /// always computed locally.
    #[serde(default = "default_true")]
    pub remote_enabled: bool,

    /// Also use the backend for products that have not been saved yet.
    #[serde(default)]
    pub remote_for_unsaved: bool,
}

fn default_true() -> bool {
    true
}

impl Default for MarginSettings {
    fn default() -> Self {
        MarginSettings {
            remote_enabled: true,
            remote_for_unsaved: false,
        }
    }
}

// =============================================================================
// Pricing Settings
// =============================================================================

/// Price synchronization behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Zero the paired field when a price is edited to zero or below.
    #[serde(default)]
    pub zero_clears_paired: bool,
}

impl PricingSettings {
    pub fn pairing_policy(&self) -> PairingPolicy {
        if self.zero_clears_paired {
            PairingPolicy::ZeroPaired
        } else {
            PairingPolicy::KeepPaired
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub margin: MarginSettings,

    #[serde(default)]
    pub pricing: PricingSettings,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (admin.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.api.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.api.connect_timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "connect_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("STOCKROOM_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Ok(timeout) = std::env::var("STOCKROOM_API_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric STOCKROOM_API_TIMEOUT_SECS"),
            }
        }

        if let Some(flag) = env_flag("STOCKROOM_MARGIN_REMOTE") {
            debug!(enabled = flag, "Overriding remote margin from environment");
            self.margin.remote_enabled = flag;
        }

        if let Some(flag) = env_flag("STOCKROOM_MARGIN_REMOTE_FOR_UNSAVED") {
            self.margin.remote_for_unsaved = flag;
        }

        if let Some(flag) = env_flag("STOCKROOM_ZERO_CLEARS_PAIRED") {
            self.pricing.zero_clears_paired = flag;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stockroom", "admin")
            .map(|dirs| dirs.config_dir().join("admin.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }

    pub fn pairing_policy(&self) -> PairingPolicy {
        self.pricing.pairing_policy()
    }
}

/// Reads a boolean environment variable. Unknown values are ignored.
fn env_flag(name: &str) -> Option<bool> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!(variable = name, value = %raw, "Ignoring unrecognised boolean");
            None
        }
    }
}
