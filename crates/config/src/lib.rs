//! Configuration management for the Krishi Mitra agent
//!
//! Supports loading configuration from:
//! - TOML files
//! - Environment variables (KRISHI_ prefix, `__` section separator)
//! - Runtime overrides in tests (plain struct construction)
//!
//! Every section has working defaults except the market dataset API key,
//! which is required: a missing key is a startup failure, not a per-request
//! one.

pub mod settings;

pub use settings::{
    AlertsConfig, GeoConfig, LlmConfig, MarketDataConfig, RagConfig, ServerConfig, Settings,
    SpeechConfig, WeatherConfig, load_settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
