//! Configuration settings management
//!
//! This module handles loading configuration from multiple sources,
//! validation, and persistence.

use crate::error::{ProvstoreError, Result};
use crate::storage::models::{AccountKind, AccountSku};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
pub struct Config {
    #[tabled(rename = "Debug")]
    pub debug: bool,
    #[tabled(rename = "Subscription ID")]
    pub subscription_id: String,
    #[tabled(skip)]
    pub tenant_id: String,
    #[tabled(rename = "Default Resource Group")]
    pub default_resource_group: String,
    #[tabled(rename = "Default Location")]
    pub default_location: String,
    #[tabled(rename = "Default SKU")]
    #[serde(default)]
    pub default_sku: AccountSku,
    #[tabled(rename = "Default Kind")]
    #[serde(default)]
    pub default_kind: AccountKind,
    #[tabled(rename = "No Color")]
    pub no_color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            subscription_id: String::new(),
            tenant_id: String::new(),
            default_resource_group: String::new(),
            default_location: "eastus".to_string(),
            default_sku: AccountSku::default(),
            default_kind: AccountKind::default(),
            no_color: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.subscription_id.is_empty()
            && uuid::Uuid::parse_str(&self.subscription_id).is_err()
        {
            return Err(ProvstoreError::config(format!(
                "Subscription ID '{}' is not a GUID",
                self.subscription_id
            )));
        }

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        // Use XDG Base Directory specification on Linux and macOS
        // On Windows, use the platform-appropriate config directory
        #[cfg(any(target_os = "linux", target_os = "macos"))]
        {
            use std::env;
            let config_dir = if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME") {
                PathBuf::from(xdg_config_home)
            } else {
                let home_dir = env::var("HOME")
                    .map_err(|_| ProvstoreError::config("HOME environment variable not set"))?;
                PathBuf::from(home_dir).join(".config")
            };
            Ok(config_dir.join("pvs").join("pvs.conf"))
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            let config_dir = dirs::config_dir()
                .ok_or_else(|| ProvstoreError::config("Unable to determine config directory"))?;
            Ok(config_dir.join("pvs").join("pvs.conf"))
        }
    }

    pub async fn load() -> Result<Self> {
        load_config().await
    }

    pub async fn save(&self) -> Result<()> {
        save_config(self).await
    }

    /// Resolve subscription ID
    /// Priority: CLI argument > config/environment
    pub fn resolve_subscription_id(&self, sub_arg: Option<String>) -> Result<String> {
        if let Some(sub) = sub_arg {
            return Ok(sub);
        }

        if !self.subscription_id.is_empty() {
            return Ok(self.subscription_id.clone());
        }

        Err(ProvstoreError::config(
            "No subscription ID specified. Use --subscription, set AZURE_SUBSCRIPTION_ID, or configure subscription_id",
        ))
    }

    /// Resolve resource group
    /// Priority: CLI argument > config default
    pub fn resolve_resource_group(&self, rg_arg: Option<String>) -> Result<String> {
        if let Some(rg) = rg_arg {
            return Ok(rg);
        }

        if !self.default_resource_group.is_empty() {
            return Ok(self.default_resource_group.clone());
        }

        Err(ProvstoreError::config(
            "No resource group specified. Use --resource-group or configure default_resource_group",
        ))
    }

    /// Resolve location
    /// Priority: CLI argument > config default
    pub fn resolve_location(&self, location_arg: Option<String>) -> Result<String> {
        if let Some(location) = location_arg {
            return Ok(location);
        }

        if !self.default_location.is_empty() {
            return Ok(self.default_location.clone());
        }

        Err(ProvstoreError::config(
            "No location specified. Use --location or configure default_location",
        ))
    }
}

/// Load configuration from multiple sources with priority order:
/// 1. Command-line flags (handled by clap)
/// 2. Environment variables
/// 3. Configuration file
/// 4. Default values
pub async fn load_config() -> Result<Config> {
    let config = load_config_no_validation().await?;

    config.validate()?;

    Ok(config)
}

/// Load configuration without validation (for config commands)
pub async fn load_config_no_validation() -> Result<Config> {
    let mut config = Config::default();

    let config_path = Config::get_config_path()?;
    if config_path.exists() {
        config = load_from_file(&config_path).await?;
    }

    load_from_env(&mut config);

    Ok(config)
}

async fn load_from_file(path: &PathBuf) -> Result<Config> {
    let contents = tokio::fs::read_to_string(path).await?;

    // Try to parse as TOML first, then JSON as fallback
    if let Ok(config) = toml::from_str::<Config>(&contents) {
        return Ok(config);
    }

    let config = serde_json::from_str::<Config>(&contents)?;
    Ok(config)
}

fn load_from_env(config: &mut Config) {
    if let Ok(value) = std::env::var("DEBUG") {
        config.debug = value.to_lowercase() == "true" || value == "1";
    }

    if let Ok(value) = std::env::var("AZURE_SUBSCRIPTION_ID") {
        config.subscription_id = value;
    }

    if let Ok(value) = std::env::var("AZURE_TENANT_ID") {
        config.tenant_id = value;
    }

    if let Ok(value) = std::env::var("DEFAULT_RESOURCE_GROUP") {
        config.default_resource_group = value;
    }

    if let Ok(value) = std::env::var("DEFAULT_LOCATION") {
        config.default_location = value;
    }

    if let Ok(value) = std::env::var("DEFAULT_SKU") {
        if let Ok(sku) = value.parse() {
            config.default_sku = sku;
        }
    }

    if let Ok(value) = std::env::var("DEFAULT_KIND") {
        if let Ok(kind) = value.parse() {
            config.default_kind = kind;
        }
    }

    if let Ok(value) = std::env::var("NO_COLOR") {
        config.no_color = !value.is_empty();
    }
}

pub async fn save_config(config: &Config) -> Result<()> {
    let config_path = Config::get_config_path()?;

    if let Some(parent) = config_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let contents = toml::to_string_pretty(config)
        .map_err(|e| ProvstoreError::serialization(e.to_string()))?;

    tokio::fs::write(&config_path, contents).await?;

    Ok(())
}

pub async fn init_default_config() -> Result<()> {
    let config_path = Config::get_config_path()?;

    // Don't overwrite existing configuration
    if config_path.exists() {
        return Ok(());
    }

    let config = Config::default();
    save_config(&config).await?;

    Ok(())
}
