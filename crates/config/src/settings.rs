//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Market price dataset configuration
    #[serde(default)]
    pub market: MarketDataConfig,

    /// Geocoding / postal lookup configuration
    #[serde(default)]
    pub geo: GeoConfig,

    /// Weather forecast configuration
    #[serde(default)]
    pub weather: WeatherConfig,

    /// LLM backend configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Speech and translation service configuration
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Document QA configuration
    #[serde(default)]
    pub rag: RagConfig,

    /// Price alert scan configuration
    #[serde(default)]
    pub alerts: AlertsConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins; empty means localhost-only
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Market price dataset configuration (data.gov.in style resource API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketDataConfig {
    /// Dataset API key — the only required setting
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_market_base_url")]
    pub base_url: String,
    /// Resource id of the daily mandi price dataset
    #[serde(default = "default_resource_id")]
    pub resource_id: String,
    /// Server-side page cap per fetch
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    #[serde(default = "default_market_timeout")]
    pub timeout_secs: u64,
    /// Commodity vocabulary cache time-to-live
    #[serde(default = "default_vocabulary_ttl")]
    pub vocabulary_ttl_secs: u64,
    /// Fuzzy-match acceptance threshold (0-100)
    #[serde(default = "default_match_threshold")]
    pub match_threshold: u8,
}

fn default_market_base_url() -> String {
    "https://api.data.gov.in/resource".to_string()
}

fn default_resource_id() -> String {
    "9ef84268-d588-465a-a308-a864a43d0070".to_string()
}

fn default_page_limit() -> u32 {
    500
}

fn default_market_timeout() -> u64 {
    15
}

fn default_vocabulary_ttl() -> u64 {
    86_400
}

fn default_match_threshold() -> u8 {
    85
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("DATA_GOV_API_KEY").unwrap_or_default(),
            base_url: default_market_base_url(),
            resource_id: default_resource_id(),
            page_limit: default_page_limit(),
            timeout_secs: default_market_timeout(),
            vocabulary_ttl_secs: default_vocabulary_ttl(),
            match_threshold: default_match_threshold(),
        }
    }
}

/// Geocoding / postal lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoConfig {
    #[serde(default = "default_postal_base_url")]
    pub postal_base_url: String,
    #[serde(default = "default_geocode_base_url")]
    pub geocode_base_url: String,
    #[serde(default = "default_reverse_base_url")]
    pub reverse_base_url: String,
    /// Country restriction applied to geocoding search results
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default = "default_geo_timeout")]
    pub timeout_secs: u64,
}

fn default_postal_base_url() -> String {
    "https://api.postalpincode.in/pincode".to_string()
}

fn default_geocode_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_reverse_base_url() -> String {
    "https://api.bigdatacloud.net/data/reverse-geocode-client".to_string()
}

fn default_country_code() -> String {
    "IN".to_string()
}

fn default_geo_timeout() -> u64 {
    10
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            postal_base_url: default_postal_base_url(),
            geocode_base_url: default_geocode_base_url(),
            reverse_base_url: default_reverse_base_url(),
            country_code: default_country_code(),
            timeout_secs: default_geo_timeout(),
        }
    }
}

/// Weather forecast configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_geo_timeout")]
    pub timeout_secs: u64,
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timezone: default_timezone(),
            timeout_secs: default_geo_timeout(),
        }
    }
}

/// LLM backend configuration (chat-completions style endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_llm_endpoint() -> String {
    "https://api.mistral.ai/v1/chat/completions".to_string()
}

fn default_llm_model() -> String {
    "mistral-large-latest".to_string()
}

fn default_llm_max_tokens() -> u32 {
    512
}

fn default_llm_temperature() -> f32 {
    0.3
}

fn default_llm_timeout() -> u64 {
    18
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            api_key: std::env::var("MISTRAL_API_KEY").ok(),
            model: default_llm_model(),
            max_tokens: default_llm_max_tokens(),
            temperature: default_llm_temperature(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

/// Speech and translation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_stt_url")]
    pub stt_url: String,
    #[serde(default = "default_tts_url")]
    pub tts_url: String,
    #[serde(default = "default_translate_url")]
    pub translate_url: String,
    #[serde(default = "default_speech_timeout")]
    pub timeout_secs: u64,
}

fn default_stt_url() -> String {
    "http://localhost:9000/transcribe".to_string()
}

fn default_tts_url() -> String {
    "http://localhost:9001/synthesize".to_string()
}

fn default_translate_url() -> String {
    "http://localhost:9002/translate".to_string()
}

fn default_speech_timeout() -> u64 {
    18
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            stt_url: default_stt_url(),
            tts_url: default_tts_url(),
            translate_url: default_translate_url(),
            timeout_secs: default_speech_timeout(),
        }
    }
}

/// Document QA configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    /// Path to the pre-embedded document index (JSON)
    #[serde(default = "default_index_path")]
    pub index_path: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_index_path() -> String {
    "data/agri_index.json".to_string()
}

fn default_top_k() -> usize {
    5
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            index_path: default_index_path(),
            top_k: default_top_k(),
        }
    }
}

/// Price alert scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_scan_interval")]
    pub scan_interval_secs: u64,
}

fn default_scan_interval() -> u64 {
    3600
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: default_scan_interval(),
        }
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings; only a missing market API key is fatal
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.market.api_key.trim().is_empty() {
            return Err(ConfigError::MissingField(
                "market.api_key (or DATA_GOV_API_KEY)".to_string(),
            ));
        }

        if self.market.match_threshold > 100 {
            return Err(ConfigError::InvalidValue {
                field: "market.match_threshold".to_string(),
                message: format!("must be 0-100, got {}", self.market.match_threshold),
            });
        }

        if self.market.page_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "market.page_limit".to_string(),
                message: "must be positive".to_string(),
            });
        }

        Ok(())
    }
}

/// Load settings from an optional TOML file plus KRISHI_-prefixed
/// environment overrides (`KRISHI_MARKET__API_KEY=...`).
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(false));
    } else {
        builder = builder.add_source(File::with_name("config/krishi").required(false));
    }

    builder = builder.add_source(Environment::with_prefix("KRISHI").separator("__"));

    let settings: Settings = builder.build()?.try_deserialize()?;

    tracing::info!(
        server_port = settings.server.port,
        market_page_limit = settings.market.page_limit,
        "Settings loaded"
    );

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.market.page_limit, 500);
        assert_eq!(settings.market.match_threshold, 85);
        assert_eq!(settings.geo.country_code, "IN");
        assert_eq!(settings.weather.timezone, "Asia/Kolkata");
        assert_eq!(settings.alerts.scan_interval_secs, 3600);
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let mut settings = Settings::default();
        settings.market.api_key = String::new();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::MissingField(_))
        ));
    }

    #[test]
    fn test_valid_settings_pass() {
        let mut settings = Settings::default();
        settings.market.api_key = "test-key".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_toml_section_parse() {
        let raw = r#"
            [market]
            api_key = "abc"
            page_limit = 100

            [server]
            port = 9090
        "#;
        let settings: Settings = toml::from_str(raw).unwrap();
        assert_eq!(settings.market.api_key, "abc");
        assert_eq!(settings.market.page_limit, 100);
        assert_eq!(settings.server.port, 9090);
        // untouched sections keep defaults
        assert_eq!(settings.market.match_threshold, 85);
    }
}
