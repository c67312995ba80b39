//! Collector output types: vegetation readings and weather risk metrics.

use serde::{Deserialize, Serialize};

/// Vegetation health classification derived from NDVI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthStatus {
    /// Classify an NDVI value.
    ///
    /// NDVI bands: < 0.2 bare soil or stressed, 0.2-0.4 sparse,
    /// 0.4-0.6 moderate, > 0.6 dense healthy vegetation.
    pub fn from_ndvi(ndvi: f64) -> Self {
        if ndvi > 0.6 {
            HealthStatus::Excellent
        } else if ndvi > 0.4 {
            HealthStatus::Good
        } else if ndvi > 0.2 {
            HealthStatus::Fair
        } else {
            HealthStatus::Poor
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            HealthStatus::Excellent => write!(f, "Excellent"),
            HealthStatus::Good => write!(f, "Good"),
            HealthStatus::Fair => write!(f, "Fair"),
            HealthStatus::Poor => write!(f, "Poor"),
        }
    }
}

/// How much trust to place in a reading, based on which provider produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingConfidence {
    Low,
    Medium,
    High,
}

/// One vegetation observation for a location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VegetationReading {
    /// Mean NDVI over the observed area, [-1, 1]
    pub mean_ndvi: f64,

    /// Health classification of `mean_ndvi`
    pub health: HealthStatus,

    /// Provider-derived confidence in the reading
    pub confidence: ReadingConfidence,

    /// Provider that produced the reading
    pub source: String,
}

impl VegetationReading {
    pub fn new(mean_ndvi: f64, confidence: ReadingConfidence, source: impl Into<String>) -> Self {
        Self {
            mean_ndvi,
            health: HealthStatus::from_ndvi(mean_ndvi),
            confidence,
            source: source.into(),
        }
    }
}

/// Qualitative weather risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low = 0,
    Medium = 1,
    High = 2,
}

impl RiskLevel {
    /// Classify an overall risk score in [0, 1]
    pub fn from_score(score: f64) -> Self {
        if score > 0.6 {
            RiskLevel::High
        } else if score > 0.3 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

/// Aggregate weather figures backing the risk metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub avg_temperature_c: f64,
    pub total_rainfall_mm: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_daily_rain_mm: Option<f64>,
}

/// Weather-derived risk metrics for a location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Drought probability, [0, 1]
    pub drought_risk: f64,

    /// Flood probability, [0, 1]
    pub flood_risk: f64,

    /// Heat stress probability, [0, 1]
    pub heat_stress_risk: f64,

    /// Weighted combination of the individual risks, [0, 1]
    pub overall_risk_score: f64,

    /// Classification of `overall_risk_score`
    pub level: RiskLevel,

    /// Underlying weather aggregates
    pub summary: WeatherSummary,

    /// Provider that produced the metrics
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_bands() {
        assert_eq!(HealthStatus::from_ndvi(0.75), HealthStatus::Excellent);
        assert_eq!(HealthStatus::from_ndvi(0.5), HealthStatus::Good);
        assert_eq!(HealthStatus::from_ndvi(0.3), HealthStatus::Fair);
        assert_eq!(HealthStatus::from_ndvi(0.1), HealthStatus::Poor);
        assert_eq!(HealthStatus::from_ndvi(-0.2), HealthStatus::Poor);
    }

    #[test]
    fn test_risk_level_bands() {
        assert_eq!(RiskLevel::from_score(0.7), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.45), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.1), RiskLevel::Low);
        // Band edges are exclusive on the high side
        assert_eq!(RiskLevel::from_score(0.6), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.3), RiskLevel::Low);
    }

    #[test]
    fn test_reading_classifies_health() {
        let reading = VegetationReading::new(0.65, ReadingConfidence::High, "open_meteo");
        assert_eq!(reading.health, HealthStatus::Excellent);
        assert_eq!(reading.source, "open_meteo");
    }
}
