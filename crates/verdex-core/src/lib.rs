//! Verdex Core: shared data model, error taxonomy, and configuration
//!
//! Types that cross crate boundaries live here: registered fields, sensor
//! snapshots, collector readings, and the untrusted AI response shape.

pub mod config;
pub mod error;
pub mod field;
pub mod readings;
pub mod response;
pub mod snapshot;

pub use config::AppConfig;
pub use error::VerdexError;
pub use field::FieldContext;
pub use readings::{
    HealthStatus, ReadingConfidence, RiskLevel, RiskMetrics, VegetationReading, WeatherSummary,
};
pub use response::{AiResponse, Claim};
pub use snapshot::{DroughtRisk, SensorSnapshot};

/// Engine version
pub const VERDEX_VERSION: &str = "0.1.0";
