//! Weather risk collection.
//!
//! Same fallback discipline as the satellite chain: Open-Meteo archive,
//! Open-Meteo forecast, NASA POWER, then a latitude/ITCZ climate model
//! that cannot fail.

use std::collections::HashMap;
use std::f64::consts::PI;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde::Deserialize;

use verdex_core::{RiskLevel, RiskMetrics, VerdexError, WeatherSummary};

/// Days of history requested from archive-style providers
const LOOKBACK_DAYS: i64 = 30;

/// One source of weather risk metrics
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Short provider label used as the metrics source
    fn name(&self) -> &'static str;

    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<RiskMetrics, VerdexError>;
}

#[derive(Deserialize)]
struct OpenMeteoResponse {
    daily: OpenMeteoDaily,
}

#[derive(Deserialize)]
struct OpenMeteoDaily {
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
}

/// Derive risk metrics from daily temperature and precipitation series.
///
/// Drought saturates when 30-day rainfall falls to zero against a 100mm
/// baseline; flood saturates at 50mm in a single day; heat stress ramps
/// over 30°C. Weights 0.4/0.3/0.3.
pub fn risk_from_daily(
    temps_max: &[f64],
    temps_min: &[f64],
    precipitation: &[f64],
    source: &str,
) -> Result<RiskMetrics, VerdexError> {
    if temps_max.is_empty() || temps_min.is_empty() || precipitation.is_empty() {
        return Err(VerdexError::ProviderError(format!(
            "{} returned an empty daily series",
            source
        )));
    }

    let mean = |values: &[f64]| values.iter().sum::<f64>() / values.len() as f64;
    let peak = |values: &[f64]| values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let avg_temp = (mean(temps_max) + mean(temps_min)) / 2.0;
    let total_rain: f64 = precipitation.iter().sum();
    let max_temp = peak(temps_max);
    let max_daily_rain = peak(precipitation);

    let drought_risk = (1.0 - total_rain / 100.0).clamp(0.0, 1.0);
    let flood_risk = (max_daily_rain / 50.0).clamp(0.0, 1.0);
    let heat_stress_risk = if max_temp > 30.0 {
        ((max_temp - 30.0) / 15.0).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let overall = drought_risk * 0.4 + flood_risk * 0.3 + heat_stress_risk * 0.3;

    Ok(RiskMetrics {
        drought_risk,
        flood_risk,
        heat_stress_risk,
        overall_risk_score: overall,
        level: RiskLevel::from_score(overall),
        summary: WeatherSummary {
            avg_temperature_c: avg_temp,
            total_rainfall_mm: total_rain,
            max_daily_rain_mm: Some(max_daily_rain),
        },
        source: source.to_string(),
    })
}

fn metrics_from_open_meteo(
    body: OpenMeteoResponse,
    source: &str,
) -> Result<RiskMetrics, VerdexError> {
    let flatten = |v: Vec<Option<f64>>| v.into_iter().flatten().collect::<Vec<f64>>();
    let temps_max = flatten(body.daily.temperature_2m_max);
    let temps_min = flatten(body.daily.temperature_2m_min);
    let precipitation = flatten(body.daily.precipitation_sum);
    risk_from_daily(&temps_max, &temps_min, &precipitation, source)
}

async fn fetch_open_meteo(
    client: &reqwest::Client,
    endpoint: &str,
    params: &[(&str, String)],
) -> Result<OpenMeteoResponse, VerdexError> {
    client
        .get(endpoint)
        .timeout(Duration::from_secs(10))
        .query(params)
        .send()
        .await
        .map_err(|e| VerdexError::ProviderError(e.to_string()))?
        .error_for_status()
        .map_err(|e| VerdexError::ProviderError(e.to_string()))?
        .json()
        .await
        .map_err(|e| VerdexError::ProviderError(e.to_string()))
}

/// Open-Meteo archive API over the last 30 days (most reliable)
pub struct OpenMeteoArchiveProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl OpenMeteoArchiveProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: verdex_core::config::OPEN_METEO_ARCHIVE_API.to_string(),
        }
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for OpenMeteoArchiveProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoArchiveProvider {
    fn name(&self) -> &'static str {
        "open_meteo_archive"
    }

    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<RiskMetrics, VerdexError> {
        let end = Utc::now().date_naive();
        let start = end - chrono::Duration::days(LOOKBACK_DAYS);

        let body = fetch_open_meteo(
            &self.client,
            &self.endpoint,
            &[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("start_date", start.format("%Y-%m-%d").to_string()),
                ("end_date", end.format("%Y-%m-%d").to_string()),
                (
                    "daily",
                    "temperature_2m_max,temperature_2m_min,precipitation_sum".to_string(),
                ),
                ("timezone", "auto".to_string()),
            ],
        )
        .await?;

        metrics_from_open_meteo(body, self.name())
    }
}

/// Open-Meteo forecast API (current conditions)
pub struct OpenMeteoForecastProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl OpenMeteoForecastProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: verdex_core::config::OPEN_METEO_FORECAST_API.to_string(),
        }
    }
}

impl Default for OpenMeteoForecastProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoForecastProvider {
    fn name(&self) -> &'static str {
        "open_meteo_forecast"
    }

    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<RiskMetrics, VerdexError> {
        let body = fetch_open_meteo(
            &self.client,
            &self.endpoint,
            &[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                (
                    "daily",
                    "temperature_2m_max,temperature_2m_min,precipitation_sum".to_string(),
                ),
                ("timezone", "auto".to_string()),
            ],
        )
        .await?;

        metrics_from_open_meteo(body, self.name())
    }
}

/// NASA POWER API (slow but official)
pub struct NasaPowerProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl NasaPowerProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: verdex_core::config::NASA_POWER_API.to_string(),
            api_key,
        }
    }
}

#[derive(Deserialize)]
struct PowerResponse {
    properties: PowerProperties,
}

#[derive(Deserialize)]
struct PowerProperties {
    parameter: PowerParameters,
}

#[derive(Deserialize)]
struct PowerParameters {
    #[serde(rename = "T2M", default)]
    t2m: HashMap<String, f64>,
    #[serde(rename = "PRECTOTCORR", default)]
    prectotcorr: HashMap<String, f64>,
}

#[async_trait]
impl WeatherProvider for NasaPowerProvider {
    fn name(&self) -> &'static str {
        "nasa_power"
    }

    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<RiskMetrics, VerdexError> {
        let end = Utc::now().date_naive();
        let start = end - chrono::Duration::days(LOOKBACK_DAYS);

        let mut params = vec![
            ("request", "execute".to_string()),
            ("format", "JSON".to_string()),
            ("user", "anonymous".to_string()),
            ("startDate", start.format("%Y%m%d").to_string()),
            ("endDate", end.format("%Y%m%d").to_string()),
            ("parameters", "T2M,PRECTOTCORR".to_string()),
            ("community", "RE".to_string()),
            ("longitude", longitude.to_string()),
            ("latitude", latitude.to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }

        let body: PowerResponse = self
            .client
            .get(&self.endpoint)
            .timeout(Duration::from_secs(10))
            .query(&params)
            .send()
            .await
            .map_err(|e| VerdexError::ProviderError(e.to_string()))?
            .error_for_status()
            .map_err(|e| VerdexError::ProviderError(e.to_string()))?
            .json()
            .await
            .map_err(|e| VerdexError::ProviderError(e.to_string()))?;

        let temps: Vec<f64> = body.properties.parameter.t2m.values().cloned().collect();
        let rain: Vec<f64> = body
            .properties
            .parameter
            .prectotcorr
            .values()
            .cloned()
            .collect();

        // POWER reports daily means, so they stand in for both series
        risk_from_daily(&temps, &temps, &rain, self.name())
    }
}

/// Deterministic risk estimate from latitude and month (lapse rate + ITCZ
/// rainfall model). Last resort in the chain; cannot fail.
pub struct LatitudeClimateModel;

#[async_trait]
impl WeatherProvider for LatitudeClimateModel {
    fn name(&self) -> &'static str {
        "climate_model"
    }

    async fn fetch(&self, latitude: f64, _longitude: f64) -> Result<RiskMetrics, VerdexError> {
        Ok(climate_estimate(latitude, Utc::now().month()))
    }
}

/// Risk metrics estimated from latitude and calendar month
pub fn climate_estimate(latitude: f64, month: u32) -> RiskMetrics {
    let abs_lat = latitude.abs();

    // Lapse-rate temperature model with a seasonal swing outside the tropics
    let base_temp = 30.0 - abs_lat * 0.6;
    let seasonal = if abs_lat > 23.5 {
        match month {
            12 | 1 | 2 => {
                if latitude > 0.0 {
                    -10.0
                } else {
                    10.0
                }
            }
            6 | 7 | 8 => {
                if latitude > 0.0 {
                    10.0
                } else {
                    -10.0
                }
            }
            _ => 0.0,
        }
    } else {
        5.0 * (month as f64 * PI / 6.0).sin()
    };
    let avg_temp = base_temp + seasonal;

    // Rainfall decays with distance from the seasonal ITCZ position
    let itcz = 10.0 * ((month as f64 - 4.0) * PI / 6.0).sin();
    let distance = (latitude - itcz).abs();
    let rainfall = (200.0 * (-distance / 15.0).exp()).max(0.0);

    let drought_risk = (1.0 - rainfall / 150.0).clamp(0.0, 1.0);
    let flood_risk = (rainfall / 300.0).clamp(0.0, 1.0);
    let heat_stress_risk = if avg_temp > 25.0 {
        ((avg_temp - 25.0) / 15.0).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let overall = drought_risk * 0.4 + flood_risk * 0.3 + heat_stress_risk * 0.3;

    RiskMetrics {
        drought_risk,
        flood_risk,
        heat_stress_risk,
        overall_risk_score: overall,
        level: RiskLevel::from_score(overall),
        summary: WeatherSummary {
            avg_temperature_c: avg_temp,
            total_rainfall_mm: rainfall,
            max_daily_rain_mm: None,
        },
        source: "climate_model".to_string(),
    }
}

/// Ordered chain of weather providers
pub struct WeatherCollector {
    providers: Vec<Box<dyn WeatherProvider>>,
}

impl WeatherCollector {
    pub fn new(providers: Vec<Box<dyn WeatherProvider>>) -> Self {
        Self { providers }
    }

    /// The default chain: archive, forecast, NASA POWER, climate model
    pub fn with_defaults(nasa_api_key: Option<String>) -> Self {
        Self::new(vec![
            Box::new(OpenMeteoArchiveProvider::new()),
            Box::new(OpenMeteoForecastProvider::new()),
            Box::new(NasaPowerProvider::new(nasa_api_key)),
            Box::new(LatitudeClimateModel),
        ])
    }

    /// Fetch risk metrics, trying providers in order
    pub async fn collect(&self, latitude: f64, longitude: f64) -> Result<RiskMetrics, VerdexError> {
        for provider in &self.providers {
            match provider.fetch(latitude, longitude).await {
                Ok(metrics) => {
                    tracing::info!(
                        source = provider.name(),
                        risk = metrics.overall_risk_score,
                        "weather metrics"
                    );
                    return Ok(metrics);
                }
                Err(e) => {
                    tracing::warn!(source = provider.name(), error = %e, "weather provider failed");
                }
            }
        }

        Err(VerdexError::ProviderError(
            "all weather providers unavailable".to_string(),
        ))
    }
}

impl Default for WeatherCollector {
    fn default() -> Self {
        Self::with_defaults(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rainfall_saturates_drought() {
        let metrics = risk_from_daily(&[25.0; 30], &[12.0; 30], &[0.0; 30], "test").unwrap();
        assert_eq!(metrics.drought_risk, 1.0);
        assert_eq!(metrics.flood_risk, 0.0);
    }

    #[test]
    fn test_heavy_single_day_rain_saturates_flood() {
        let mut rain = vec![1.0; 30];
        rain[10] = 60.0;
        let metrics = risk_from_daily(&[20.0; 30], &[10.0; 30], &rain, "test").unwrap();
        assert_eq!(metrics.flood_risk, 1.0);
    }

    #[test]
    fn test_heat_stress_only_above_threshold() {
        let cool = risk_from_daily(&[25.0; 30], &[15.0; 30], &[5.0; 30], "test").unwrap();
        assert_eq!(cool.heat_stress_risk, 0.0);

        let hot = risk_from_daily(&[45.0; 30], &[30.0; 30], &[5.0; 30], "test").unwrap();
        assert_eq!(hot.heat_stress_risk, 1.0);
    }

    #[test]
    fn test_empty_series_is_an_error() {
        assert!(risk_from_daily(&[], &[], &[], "test").is_err());
    }

    #[test]
    fn test_risk_level_matches_score() {
        let metrics = risk_from_daily(&[20.0; 30], &[10.0; 30], &[0.5; 30], "test").unwrap();
        assert_eq!(metrics.level, RiskLevel::from_score(metrics.overall_risk_score));
    }

    #[test]
    fn test_climate_estimate_deterministic_and_bounded() {
        for lat in [-60.0, -20.0, 0.0, 20.0, 60.0] {
            for month in 1..=12 {
                let metrics = climate_estimate(lat, month);
                assert!((0.0..=1.0).contains(&metrics.overall_risk_score));
                assert_eq!(
                    metrics.overall_risk_score,
                    climate_estimate(lat, month).overall_risk_score
                );
            }
        }
    }

    #[test]
    fn test_equator_wetter_than_desert_belt() {
        // In April the ITCZ sits near the equator; the subtropical belt
        // should read drier.
        let equator = climate_estimate(0.0, 4);
        let subtropics = climate_estimate(28.0, 4);
        assert!(equator.summary.total_rainfall_mm > subtropics.summary.total_rainfall_mm);
    }

    struct AlwaysFails;

    #[async_trait]
    impl WeatherProvider for AlwaysFails {
        fn name(&self) -> &'static str {
            "always_fails"
        }

        async fn fetch(&self, _: f64, _: f64) -> Result<RiskMetrics, VerdexError> {
            Err(VerdexError::ProviderError("timeout".to_string()))
        }
    }

    #[tokio::test]
    async fn test_chain_falls_back_to_climate_model() {
        let collector = WeatherCollector::new(vec![
            Box::new(AlwaysFails),
            Box::new(LatitudeClimateModel),
        ]);

        let metrics = collector.collect(42.0, -93.6).await.unwrap();
        assert_eq!(metrics.source, "climate_model");
    }
}
