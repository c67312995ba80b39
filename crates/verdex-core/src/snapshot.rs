//! Ground-truth sensor snapshots.
//!
//! A `SensorSnapshot` fixes the measured inputs for one analysis run. It is
//! produced fresh per request from collector readings and never mutated:
//! the output validator compares AI claims against exactly these values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::readings::{RiskMetrics, VegetationReading};

/// Qualitative drought-risk indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DroughtRisk {
    Low,
    Moderate,
    High,
}

impl DroughtRisk {
    /// Classify a drought probability in [0, 1]
    pub fn from_probability(p: f64) -> Self {
        if p > 0.6 {
            DroughtRisk::High
        } else if p > 0.3 {
            DroughtRisk::Moderate
        } else {
            DroughtRisk::Low
        }
    }
}

/// The measured inputs for one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// Mean NDVI measured by the satellite collector, [-1, 1]
    pub mean_ndvi: f64,

    /// Average temperature in degrees Celsius
    pub temperature_c: f64,

    /// Total precipitation in millimetres, >= 0
    pub precipitation_mm: f64,

    /// Qualitative drought-risk indicator
    pub drought_risk: DroughtRisk,

    /// Provider that produced the vegetation reading
    pub satellite_source: String,

    /// Provider that produced the weather metrics
    pub weather_source: String,

    /// When the snapshot was assembled
    pub observed_at: DateTime<Utc>,
}

impl SensorSnapshot {
    /// Assemble a snapshot from collector outputs
    pub fn from_readings(vegetation: &VegetationReading, weather: &RiskMetrics) -> Self {
        Self {
            mean_ndvi: vegetation.mean_ndvi,
            temperature_c: weather.summary.avg_temperature_c,
            precipitation_mm: weather.summary.total_rainfall_mm,
            drought_risk: DroughtRisk::from_probability(weather.drought_risk),
            satellite_source: vegetation.source.clone(),
            weather_source: weather.source.clone(),
            observed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readings::{ReadingConfidence, RiskLevel, WeatherSummary};

    fn sample_weather() -> RiskMetrics {
        RiskMetrics {
            drought_risk: 0.7,
            flood_risk: 0.1,
            heat_stress_risk: 0.2,
            overall_risk_score: 0.37,
            level: RiskLevel::Medium,
            summary: WeatherSummary {
                avg_temperature_c: 21.5,
                total_rainfall_mm: 42.0,
                max_daily_rain_mm: Some(12.0),
            },
            source: "open_meteo_archive".to_string(),
        }
    }

    #[test]
    fn test_drought_classification() {
        assert_eq!(DroughtRisk::from_probability(0.8), DroughtRisk::High);
        assert_eq!(DroughtRisk::from_probability(0.4), DroughtRisk::Moderate);
        assert_eq!(DroughtRisk::from_probability(0.0), DroughtRisk::Low);
    }

    #[test]
    fn test_snapshot_from_readings() {
        let veg = VegetationReading::new(0.55, ReadingConfidence::High, "open_meteo");
        let snapshot = SensorSnapshot::from_readings(&veg, &sample_weather());

        assert_eq!(snapshot.mean_ndvi, 0.55);
        assert_eq!(snapshot.temperature_c, 21.5);
        assert_eq!(snapshot.precipitation_mm, 42.0);
        assert_eq!(snapshot.drought_risk, DroughtRisk::High);
        assert_eq!(snapshot.satellite_source, "open_meteo");
        assert_eq!(snapshot.weather_source, "open_meteo_archive");
    }
}
