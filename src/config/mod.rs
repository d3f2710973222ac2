use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::DEFAULT_MAX_SNAPSHOT_ITEMS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {message}")]
    LoadError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub observability: ObservabilityConfig,
}

/// Behavior knobs for the cart store itself
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Label shown for items the source delivered without a name
    #[serde(default = "default_fallback_item_label")]
    pub fallback_item_label: String,

    /// Asset reference used for items without an image
    #[serde(default = "default_image_asset")]
    pub default_image_asset: String,

    /// Upper bound on the number of items accepted from one snapshot
    #[serde(default = "default_max_snapshot_items")]
    pub max_snapshot_items: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,

    #[serde(default = "default_service_version")]
    pub service_version: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_enable_json_logging")]
    pub enable_json_logging: bool,
}

impl Config {
    /// Load configuration from `SERVICECART_*` environment variables,
    /// falling back to defaults for anything unset
    pub fn from_environment() -> Result<Self, ConfigError> {
        info!("Loading configuration from environment");

        let store = StoreConfig::from_env()?;
        let observability = ObservabilityConfig::from_env()?;

        let config = Config {
            store,
            observability,
        };

        config.validate()?;

        info!("Configuration loaded successfully");
        debug!("Configuration: {:?}", config);

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.store.fallback_item_label.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Fallback item label cannot be empty".to_string(),
            });
        }

        if self.store.default_image_asset.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Default image asset cannot be empty".to_string(),
            });
        }

        if self.store.max_snapshot_items == 0 {
            return Err(ConfigError::ValidationError {
                message: "Snapshot item limit cannot be 0".to_string(),
            });
        }

        if self.observability.service_name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Service name cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl StoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("SERVICECART"))
            .build()
            .map_err(|e| ConfigError::LoadError {
                message: format!("Failed to load store config: {}", e),
            })?;

        settings
            .try_deserialize()
            .map_err(|e| ConfigError::LoadError {
                message: format!("Failed to deserialize store config: {}", e),
            })
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            fallback_item_label: default_fallback_item_label(),
            default_image_asset: default_image_asset(),
            max_snapshot_items: default_max_snapshot_items(),
        }
    }
}

impl ObservabilityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("SERVICECART"))
            .build()
            .map_err(|e| ConfigError::LoadError {
                message: format!("Failed to load observability config: {}", e),
            })?;

        settings
            .try_deserialize()
            .map_err(|e| ConfigError::LoadError {
                message: format!("Failed to deserialize observability config: {}", e),
            })
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            service_version: default_service_version(),
            log_level: default_log_level(),
            enable_json_logging: default_enable_json_logging(),
        }
    }
}

// Default value functions
pub(crate) fn default_fallback_item_label() -> String {
    "Service".to_string()
}

pub(crate) fn default_image_asset() -> String {
    "assets/service-placeholder.png".to_string()
}

pub(crate) fn default_max_snapshot_items() -> usize {
    DEFAULT_MAX_SNAPSHOT_ITEMS
}

pub(crate) fn default_service_name() -> String {
    "servicecart-rs".to_string()
}

pub(crate) fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_enable_json_logging() -> bool {
    false
}
