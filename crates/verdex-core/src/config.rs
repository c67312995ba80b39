//! Process configuration.
//!
//! Environment variables are read once at startup into an `AppConfig`;
//! downstream components receive the values they need by injection and do
//! not touch the environment themselves.

use serde::{Deserialize, Serialize};

/// Default NASA POWER endpoint
pub const NASA_POWER_API: &str = "https://power.larc.nasa.gov/api/power";
/// Default Open-Meteo archive endpoint
pub const OPEN_METEO_ARCHIVE_API: &str = "https://archive-api.open-meteo.com/v1/archive";
/// Default Open-Meteo forecast endpoint
pub const OPEN_METEO_FORECAST_API: &str = "https://api.open-meteo.com/v1/forecast";
/// Default Open-Meteo vegetation endpoint
pub const OPEN_METEO_VEGETATION_API: &str = "https://api.open-meteo.com/v1/vegetation";
/// Default Gemini generateContent endpoint
pub const GEMINI_API: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

/// Application configuration, read from the environment once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Session secret (SECRET_KEY)
    pub secret_key: String,

    /// Gemini API key, if insight generation is enabled (GEMINI_API_KEY)
    pub gemini_api_key: Option<String>,

    /// NASA API key for the POWER weather provider (NASA_API_KEY)
    pub nasa_api_key: Option<String>,

    /// Listen address for the API server (VERDEX_ADDR)
    pub bind_addr: String,
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        let gemini_api_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
        let nasa_api_key = std::env::var("NASA_API_KEY").ok().filter(|k| !k.is_empty());

        tracing::info!(
            gemini = gemini_api_key.is_some(),
            nasa = nasa_api_key.is_some(),
            "configuration loaded"
        );

        Self {
            secret_key: std::env::var("SECRET_KEY").unwrap_or_else(|_| "dev-key-123".to_string()),
            gemini_api_key,
            nasa_api_key,
            bind_addr: std::env::var("VERDEX_ADDR").unwrap_or_else(|_| "0.0.0.0:8787".to_string()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            secret_key: "dev-key-123".to_string(),
            gemini_api_key: None,
            nasa_api_key: None,
            bind_addr: "0.0.0.0:8787".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.bind_addr, "0.0.0.0:8787");
    }
}
