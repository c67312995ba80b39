//! Satellite vegetation data collection.
//!
//! Providers are tried in order of reliability; the first success wins.
//! The chain ends in a deterministic solar/climate model so a reading is
//! always available, tagged with low confidence and its model source.

use std::f64::consts::PI;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Datelike;
use serde::Deserialize;

use verdex_core::{ReadingConfidence, VegetationReading, VerdexError};

/// Default Land Viewer NDVI endpoint
pub const LAND_VIEWER_API: &str = "https://api.earthcache.com/v1/ndvi";

/// One source of vegetation readings
#[async_trait]
pub trait VegetationProvider: Send + Sync {
    /// Short provider label used as the reading source
    fn name(&self) -> &'static str;

    async fn fetch(&self, latitude: f64, longitude: f64)
        -> Result<VegetationReading, VerdexError>;
}

/// Land Viewer NDVI API (fast, free tier)
pub struct LandViewerProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl LandViewerProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: LAND_VIEWER_API.to_string(),
        }
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for LandViewerProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct LandViewerResponse {
    ndvi: f64,
}

#[async_trait]
impl VegetationProvider for LandViewerProvider {
    fn name(&self) -> &'static str {
        "land_viewer"
    }

    async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<VegetationReading, VerdexError> {
        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        let body: LandViewerResponse = self
            .client
            .get(&self.endpoint)
            .timeout(Duration::from_secs(5))
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("date", today),
                ("api_key", "demo".to_string()),
            ])
            .send()
            .await
            .map_err(|e| VerdexError::ProviderError(e.to_string()))?
            .error_for_status()
            .map_err(|e| VerdexError::ProviderError(e.to_string()))?
            .json()
            .await
            .map_err(|e| VerdexError::ProviderError(e.to_string()))?;

        Ok(VegetationReading::new(
            body.ndvi,
            ReadingConfidence::High,
            self.name(),
        ))
    }
}

/// Open-Meteo daily vegetation API
pub struct OpenMeteoVegetationProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl OpenMeteoVegetationProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: verdex_core::config::OPEN_METEO_VEGETATION_API.to_string(),
        }
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for OpenMeteoVegetationProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct OpenMeteoVegetationResponse {
    daily: OpenMeteoVegetationDaily,
}

#[derive(Deserialize)]
struct OpenMeteoVegetationDaily {
    #[serde(default)]
    ndvi: Vec<Option<f64>>,
}

#[async_trait]
impl VegetationProvider for OpenMeteoVegetationProvider {
    fn name(&self) -> &'static str {
        "open_meteo_vegetation"
    }

    async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<VegetationReading, VerdexError> {
        let body: OpenMeteoVegetationResponse = self
            .client
            .get(&self.endpoint)
            .timeout(Duration::from_secs(5))
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("daily", "ndvi".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(|e| VerdexError::ProviderError(e.to_string()))?
            .error_for_status()
            .map_err(|e| VerdexError::ProviderError(e.to_string()))?
            .json()
            .await
            .map_err(|e| VerdexError::ProviderError(e.to_string()))?;

        let values: Vec<f64> = body.daily.ndvi.into_iter().flatten().collect();
        if values.is_empty() {
            return Err(VerdexError::ProviderError(
                "open-meteo returned no ndvi values".to_string(),
            ));
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        Ok(VegetationReading::new(
            mean,
            ReadingConfidence::Medium,
            self.name(),
        ))
    }
}

/// Deterministic NDVI estimate from solar angle and climate patterns.
///
/// Last resort in the chain: a mathematical model, not a hardcoded value,
/// and it cannot fail.
pub struct SolarClimateModel;

#[async_trait]
impl VegetationProvider for SolarClimateModel {
    fn name(&self) -> &'static str {
        "solar_model"
    }

    async fn fetch(
        &self,
        latitude: f64,
        _longitude: f64,
    ) -> Result<VegetationReading, VerdexError> {
        let day_of_year = chrono::Utc::now().ordinal();
        Ok(VegetationReading::new(
            solar_ndvi_estimate(latitude, day_of_year),
            ReadingConfidence::Low,
            self.name(),
        ))
    }
}

/// NDVI estimate from latitude and day of year.
///
/// Combines a temperature factor (insolation by latitude) with a rain
/// factor (distance from the seasonal ITCZ position), attenuated toward
/// the poles and clipped to the vegetated range.
pub fn solar_ndvi_estimate(latitude: f64, day_of_year: u32) -> f64 {
    let temp_factor = (latitude.abs() * PI / 180.0).cos();

    let itcz_position = 10.0 * (2.0 * PI * (day_of_year as f64 - 80.0) / 365.0).sin();
    let distance_from_itcz = (latitude - itcz_position).abs();
    let rain_factor = (1.0 - distance_from_itcz / 60.0).max(0.0);

    let mut ndvi = 0.2 + 0.6 * temp_factor * rain_factor;

    if latitude.abs() > 60.0 {
        ndvi *= 0.3;
    } else if latitude.abs() > 45.0 {
        ndvi *= 0.7;
    }

    ndvi.clamp(0.1, 0.85)
}

/// Ordered chain of vegetation providers
pub struct SatelliteCollector {
    providers: Vec<Box<dyn VegetationProvider>>,
}

impl SatelliteCollector {
    pub fn new(providers: Vec<Box<dyn VegetationProvider>>) -> Self {
        Self { providers }
    }

    /// The default chain: Land Viewer, Open-Meteo, solar model
    pub fn with_defaults() -> Self {
        Self::new(vec![
            Box::new(LandViewerProvider::new()),
            Box::new(OpenMeteoVegetationProvider::new()),
            Box::new(SolarClimateModel),
        ])
    }

    /// Fetch a vegetation reading, trying providers in order
    pub async fn collect(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<VegetationReading, VerdexError> {
        for provider in &self.providers {
            match provider.fetch(latitude, longitude).await {
                Ok(reading) => {
                    tracing::info!(source = provider.name(), ndvi = reading.mean_ndvi, "vegetation reading");
                    return Ok(reading);
                }
                Err(e) => {
                    tracing::warn!(source = provider.name(), error = %e, "vegetation provider failed");
                }
            }
        }

        Err(VerdexError::ProviderError(
            "all satellite providers unavailable".to_string(),
        ))
    }
}

impl Default for SatelliteCollector {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdex_core::HealthStatus;

    struct AlwaysFails;

    #[async_trait]
    impl VegetationProvider for AlwaysFails {
        fn name(&self) -> &'static str {
            "always_fails"
        }

        async fn fetch(&self, _: f64, _: f64) -> Result<VegetationReading, VerdexError> {
            Err(VerdexError::ProviderError("unreachable host".to_string()))
        }
    }

    #[test]
    fn test_solar_estimate_in_range() {
        for lat in [-80.0, -45.0, 0.0, 23.5, 45.0, 70.0] {
            for day in [1, 90, 180, 270, 365] {
                let ndvi = solar_ndvi_estimate(lat, day);
                assert!((0.1..=0.85).contains(&ndvi), "lat={} day={} ndvi={}", lat, day, ndvi);
            }
        }
    }

    #[test]
    fn test_solar_estimate_attenuates_toward_poles() {
        // Same day; equatorial vegetation should beat polar
        assert!(solar_ndvi_estimate(0.0, 180) > solar_ndvi_estimate(70.0, 180));
    }

    #[test]
    fn test_solar_estimate_deterministic() {
        assert_eq!(solar_ndvi_estimate(42.0, 200), solar_ndvi_estimate(42.0, 200));
    }

    #[tokio::test]
    async fn test_chain_falls_back_to_model() {
        let collector = SatelliteCollector::new(vec![
            Box::new(AlwaysFails),
            Box::new(AlwaysFails),
            Box::new(SolarClimateModel),
        ]);

        let reading = collector.collect(42.0, -93.6).await.unwrap();
        assert_eq!(reading.source, "solar_model");
        assert_eq!(reading.confidence, ReadingConfidence::Low);
        assert_eq!(reading.health, HealthStatus::from_ndvi(reading.mean_ndvi));
    }

    #[tokio::test]
    async fn test_empty_chain_errors() {
        let collector = SatelliteCollector::new(vec![Box::new(AlwaysFails)]);
        assert!(collector.collect(0.0, 0.0).await.is_err());
    }
}
