//! Field analysis orchestration.
//!
//! The measured-data analysis always runs and always succeeds; AI insight
//! is an enhancement layered on top, and it only reaches the result after
//! the output validator accepts it. A rejected or unavailable insight
//! degrades to the measured-data analysis with a clearly labeled fallback
//! note, never to partial or hallucinated content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use verdex_core::{
    FieldContext, HealthStatus, ReadingConfidence, RiskLevel, RiskMetrics, SensorSnapshot,
    VegetationReading, VerdexError, WeatherSummary,
};
use verdex_validator::{AuditSink, OutputValidator};

use crate::insight::InsightModel;
use crate::prompt::PromptBuilder;

/// Label shown when insight is rejected or unavailable
pub const INSIGHT_FALLBACK_NOTE: &str =
    "AI insight unavailable - report reflects measured data only";

/// How an analysis was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    /// Measured data plus validated AI insight
    AiEnhanced,
    /// Measured data only
    Basic,
}

/// Per-hazard risk probabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskBreakdown {
    pub drought: f64,
    pub flood: f64,
    pub heat_stress: f64,
}

/// Which providers supplied the measured data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSources {
    pub satellite: String,
    pub weather: String,
}

/// Validated AI insight attached to an analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightSummary {
    pub narrative: String,
    pub recommendation: String,
    /// Validator confidence in the insight, [0, 1]
    pub confidence: f64,
}

/// The complete result of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldAnalysis {
    pub field_id: Uuid,
    pub kind: AnalysisKind,
    pub overall_risk: RiskLevel,
    pub risk_score: f64,
    pub vegetation_health: HealthStatus,
    pub ndvi_value: f64,
    pub reading_confidence: ReadingConfidence,
    pub risk_breakdown: RiskBreakdown,
    pub weather_summary: WeatherSummary,
    pub recommendations: Vec<String>,
    pub premium_adjustment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<InsightSummary>,
    pub data_sources: DataSources,
    pub generated_at: DateTime<Utc>,
}

/// Orchestrates measured-data analysis and gated AI insight
pub struct Analyzer {
    validator: OutputValidator,
    prompts: PromptBuilder,
    model: Option<Box<dyn InsightModel>>,
}

impl Analyzer {
    pub fn new() -> Result<Self, VerdexError> {
        Ok(Self {
            validator: OutputValidator::default(),
            prompts: PromptBuilder::new()?,
            model: None,
        })
    }

    /// Enable AI insight through the given model
    pub fn with_model(mut self, model: Box<dyn InsightModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Replace the default validator
    pub fn with_validator(mut self, validator: OutputValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Analyze one field from its collected readings.
    ///
    /// Always returns an analysis; AI insight is attached only when the
    /// validator accepts it, and every validation lands in `audit`.
    pub async fn analyze(
        &self,
        field: &FieldContext,
        vegetation: &VegetationReading,
        weather: &RiskMetrics,
        audit: &mut dyn AuditSink,
    ) -> Result<FieldAnalysis, VerdexError> {
        let mut analysis = basic_analysis(field, vegetation, weather);

        let Some(model) = &self.model else {
            return Ok(analysis);
        };

        let snapshot = SensorSnapshot::from_readings(vegetation, weather);
        let prompt = self.prompts.build(field, vegetation, weather)?;

        match model.generate(&prompt).await {
            Ok(response) => {
                let verdict = self.validator.validate(&response, &snapshot, audit);
                if verdict.is_accepted() {
                    analysis.kind = AnalysisKind::AiEnhanced;
                    analysis.insight = Some(InsightSummary {
                        narrative: response.narrative,
                        recommendation: response.recommendation,
                        confidence: verdict.confidence,
                    });
                } else {
                    tracing::warn!(model = model.name(), %verdict, "insight rejected by validator");
                    analysis.recommendations.push(INSIGHT_FALLBACK_NOTE.to_string());
                }
            }
            Err(e) => {
                tracing::warn!(model = model.name(), error = %e, "insight generation failed");
                analysis.recommendations.push(INSIGHT_FALLBACK_NOTE.to_string());
            }
        }

        Ok(analysis)
    }
}

/// Analysis computed from measured data alone.
///
/// Overall risk blends the weather score with vegetation deficit; the
/// premium bands and recommendation thresholds follow the underwriting
/// rubric.
pub fn basic_analysis(
    field: &FieldContext,
    vegetation: &VegetationReading,
    weather: &RiskMetrics,
) -> FieldAnalysis {
    let ndvi = vegetation.mean_ndvi;
    let overall = (weather.overall_risk_score + (1.0 - ndvi)) / 2.0;

    let (level, premium) = if overall > 0.6 {
        (RiskLevel::High, "+15% to +25%")
    } else if overall > 0.3 {
        (RiskLevel::Medium, "+5% to +10%")
    } else {
        (RiskLevel::Low, "-5% to 0%")
    };

    let mut recommendations = Vec::new();

    if weather.drought_risk > 0.6 {
        recommendations.push(format!(
            "High drought risk ({:.0}%) - implement irrigation",
            weather.drought_risk * 100.0
        ));
    } else if weather.drought_risk > 0.3 {
        recommendations.push(format!(
            "Moderate drought risk ({:.0}%) - monitor soil moisture",
            weather.drought_risk * 100.0
        ));
    }

    if weather.flood_risk > 0.6 {
        recommendations.push(format!(
            "High flood risk ({:.0}%) - improve drainage",
            weather.flood_risk * 100.0
        ));
    }

    if weather.heat_stress_risk > 0.6 {
        recommendations.push(format!(
            "High heat stress ({:.0}%) - consider heat-resistant varieties",
            weather.heat_stress_risk * 100.0
        ));
    }

    if ndvi < 0.3 {
        recommendations.push(format!(
            "Low vegetation health (NDVI {:.2}) - soil amendment needed",
            ndvi
        ));
    } else if ndvi > 0.7 {
        recommendations.push(format!("Excellent vegetation health (NDVI {:.2})", ndvi));
    }

    if recommendations.is_empty() {
        recommendations.push("Conditions normal - continue current practices".to_string());
    }

    FieldAnalysis {
        field_id: field.id,
        kind: AnalysisKind::Basic,
        overall_risk: level,
        risk_score: overall,
        vegetation_health: vegetation.health,
        ndvi_value: ndvi,
        reading_confidence: vegetation.confidence,
        risk_breakdown: RiskBreakdown {
            drought: weather.drought_risk,
            flood: weather.flood_risk,
            heat_stress: weather.heat_stress_risk,
        },
        weather_summary: weather.summary.clone(),
        recommendations,
        premium_adjustment: premium.to_string(),
        insight: None,
        data_sources: DataSources {
            satellite: vegetation.source.clone(),
            weather: weather.source.clone(),
        },
        generated_at: Utc::now(),
    }
}
