use std::env;
use std::fs;

use serde::Deserialize;

use crate::errors::ConfigError;

#[derive(Deserialize)]
pub struct Config {
    pub web_server: WebServer,
    pub owm: Owm,
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Deserialize)]
pub struct WebServer {
    pub bind_address: String,
    pub bind_port: u16,
}

#[derive(Deserialize)]
pub struct Owm {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_geo_url")]
    pub geo_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Deserialize)]
pub struct DashboardConfig {
    pub default_city: String,
    pub peer_cities: Vec<String>,
}

#[derive(Deserialize)]
pub struct Logging {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for Logging {
    fn default() -> Self {
        Logging { level: default_log_level() }
    }
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_geo_url() -> String {
    "https://api.openweathermap.org/geo/1.0".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Loads the application configuration
///
/// The configuration file path is taken from the WEATHERDASH_CONFIG
/// environment variable, falling back to weatherdash.toml in the working
/// directory
pub fn config() -> Result<Config, ConfigError> {
    let path = env::var("WEATHERDASH_CONFIG").unwrap_or_else(|_| "weatherdash.toml".to_string());
    let content = fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&content)?;

    if config.owm.api_key.is_empty() {
        return Err(ConfigError::from("owm.api_key must not be empty"));
    }
    if config.dashboard.default_city.is_empty() {
        return Err(ConfigError::from("dashboard.default_city must not be empty"));
    }

    Ok(config)
}
