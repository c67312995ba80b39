//! Shared application state.
//!
//! Field and analysis stores are in-memory maps behind async locks; the
//! audit log is the shared, single-writer-locked sink every validation
//! appends to.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use verdex_analyzer::{Analyzer, FieldAnalysis, GeminiModel};
use verdex_collectors::{SatelliteCollector, WeatherCollector};
use verdex_core::{AppConfig, FieldContext, VerdexError};
use verdex_report::ReportRenderer;
use verdex_validator::SharedAuditLog;

pub struct AppState {
    pub fields: RwLock<HashMap<Uuid, FieldContext>>,
    pub analyses: RwLock<HashMap<Uuid, Vec<FieldAnalysis>>>,
    pub satellite: SatelliteCollector,
    pub weather: WeatherCollector,
    pub analyzer: Analyzer,
    pub reports: ReportRenderer,
    pub audit: SharedAuditLog,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build production state from process configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, VerdexError> {
        let mut analyzer = Analyzer::new()?;
        if let Some(key) = &config.gemini_api_key {
            analyzer = analyzer.with_model(Box::new(GeminiModel::new(key.clone())));
        } else {
            tracing::warn!("GEMINI_API_KEY not set; analyses will be measured-data only");
        }

        Ok(Self {
            fields: RwLock::new(HashMap::new()),
            analyses: RwLock::new(HashMap::new()),
            satellite: SatelliteCollector::with_defaults(),
            weather: WeatherCollector::with_defaults(config.nasa_api_key.clone()),
            analyzer,
            reports: ReportRenderer::new()?,
            audit: SharedAuditLog::new(),
        })
    }

    /// State backed only by the deterministic model providers; no network,
    /// no keys. Used by tests and offline runs.
    pub fn offline(analyzer: Analyzer) -> Result<Self, VerdexError> {
        Ok(Self {
            fields: RwLock::new(HashMap::new()),
            analyses: RwLock::new(HashMap::new()),
            satellite: SatelliteCollector::new(vec![Box::new(
                verdex_collectors::SolarClimateModel,
            )]),
            weather: WeatherCollector::new(vec![Box::new(
                verdex_collectors::LatitudeClimateModel,
            )]),
            analyzer,
            reports: ReportRenderer::new()?,
            audit: SharedAuditLog::new(),
        })
    }
}
