//! Report rendering.
//!
//! Handlebars rendering with two custom helpers:
//! - percent: format a [0, 1] ratio as a percentage
//! - default: fall back to a default string for empty values

use handlebars::{Context, Handlebars, Helper, HelperResult, Output, RenderContext};
use serde_json::json;

use verdex_analyzer::FieldAnalysis;
use verdex_core::{FieldContext, VerdexError};

use crate::templates::{FIELD_REPORT_TEMPLATE, UNAVAILABLE_TEMPLATE};

/// Compiled report renderer with registered helpers
pub struct ReportRenderer {
    handlebars: Handlebars<'static>,
}

impl ReportRenderer {
    pub fn new() -> Result<Self, VerdexError> {
        let mut handlebars = Handlebars::new();
        // Reports are plain text, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_helper("percent", Box::new(percent_helper));
        handlebars.register_helper("default", Box::new(default_helper));

        handlebars
            .register_template_string("field_report", FIELD_REPORT_TEMPLATE)
            .map_err(|e| VerdexError::TemplateError(e.to_string()))?;
        handlebars
            .register_template_string("unavailable", UNAVAILABLE_TEMPLATE)
            .map_err(|e| VerdexError::TemplateError(e.to_string()))?;

        Ok(Self { handlebars })
    }

    /// Render the verification report for one analysis
    pub fn render_field_report(
        &self,
        field: &FieldContext,
        analysis: &FieldAnalysis,
    ) -> Result<String, VerdexError> {
        let data = json!({
            "report_id": field.report_id(),
            "generated_at": analysis.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            "name": field.name,
            "latitude": field.latitude,
            "longitude": field.longitude,
            "acres": field.acres,
            "crop_type": field.crop_type,
            "ndvi_value": format!("{:.3}", analysis.ndvi_value),
            "vegetation_health": analysis.vegetation_health.to_string(),
            "reading_confidence": format!("{:?}", analysis.reading_confidence),
            "satellite_source": analysis.data_sources.satellite,
            "weather_source": analysis.data_sources.weather,
            "avg_temperature_c": format!("{:.1}", analysis.weather_summary.avg_temperature_c),
            "total_rainfall_mm": format!("{:.1}", analysis.weather_summary.total_rainfall_mm),
            "drought": analysis.risk_breakdown.drought,
            "flood": analysis.risk_breakdown.flood,
            "heat_stress": analysis.risk_breakdown.heat_stress,
            "risk_score": format!("{:.3}", analysis.risk_score),
            "overall_risk": analysis.overall_risk.to_string(),
            "premium_adjustment": analysis.premium_adjustment,
            "recommendations": analysis.recommendations,
            "insight": analysis.insight.as_ref().map(|i| json!({
                "narrative": i.narrative,
                "recommendation": i.recommendation,
                "confidence": i.confidence,
            })),
        });

        self.handlebars
            .render("field_report", &data)
            .map_err(|e| VerdexError::TemplateError(e.to_string()))
    }

    /// Render the unavailable-data report with a stated reason
    pub fn render_unavailable(
        &self,
        field: &FieldContext,
        reason: &str,
    ) -> Result<String, VerdexError> {
        let data = json!({
            "report_id": field.report_id(),
            "generated_at": chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            "name": field.name,
            "latitude": field.latitude,
            "longitude": field.longitude,
            "acres": field.acres,
            "reason": reason,
        });

        self.handlebars
            .render("unavailable", &data)
            .map_err(|e| VerdexError::TemplateError(e.to_string()))
    }
}

// ============================================================================
// Custom Helpers
// ============================================================================

/// Format a ratio as a percentage (0.85 -> "85%")
fn percent_helper(
    h: &Helper,
    _r: &Handlebars,
    _ctx: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let value = h.param(0).and_then(|v| v.value().as_f64()).unwrap_or(0.0);
    let percent = (value * 100.0).round() as i64;
    out.write(&format!("{}%", percent))?;
    Ok(())
}

/// Substitute a default for null or empty values
fn default_helper(
    h: &Helper,
    _r: &Handlebars,
    _ctx: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let value = h.param(0).map(|v| v.value());
    let default = h.param(1).and_then(|v| v.value().as_str()).unwrap_or("");

    match value {
        Some(v) if !v.is_null() => {
            if let Some(s) = v.as_str() {
                if s.is_empty() {
                    out.write(default)?;
                } else {
                    out.write(s)?;
                }
            } else {
                out.write(&v.to_string())?;
            }
        }
        _ => out.write(default)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdex_analyzer::{AnalysisKind, DataSources, InsightSummary, RiskBreakdown};
    use verdex_core::{HealthStatus, ReadingConfidence, RiskLevel, WeatherSummary};

    fn field() -> FieldContext {
        FieldContext::new("North Plot", 42.0347, -93.62, 150.0, "Corn").unwrap()
    }

    fn analysis(field: &FieldContext, insight: Option<InsightSummary>) -> FieldAnalysis {
        FieldAnalysis {
            field_id: field.id,
            kind: if insight.is_some() {
                AnalysisKind::AiEnhanced
            } else {
                AnalysisKind::Basic
            },
            overall_risk: RiskLevel::Medium,
            risk_score: 0.42,
            vegetation_health: HealthStatus::Good,
            ndvi_value: 0.55,
            reading_confidence: ReadingConfidence::High,
            risk_breakdown: RiskBreakdown {
                drought: 0.5,
                flood: 0.1,
                heat_stress: 0.2,
            },
            weather_summary: WeatherSummary {
                avg_temperature_c: 21.3,
                total_rainfall_mm: 48.0,
                max_daily_rain_mm: Some(9.0),
            },
            recommendations: vec![
                "Moderate drought risk (50%) - monitor soil moisture".to_string(),
            ],
            premium_adjustment: "+5% to +10%".to_string(),
            insight,
            data_sources: DataSources {
                satellite: "land_viewer".to_string(),
                weather: "open_meteo_archive".to_string(),
            },
            generated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_report_contains_field_and_risk() {
        let renderer = ReportRenderer::new().unwrap();
        let f = field();
        let report = renderer.render_field_report(&f, &analysis(&f, None)).unwrap();

        assert!(report.contains("North Plot"));
        assert!(report.contains("Drought Risk: 50%"));
        assert!(report.contains("Risk Classification: Medium"));
        assert!(report.contains("Premium Adjustment: +5% to +10%"));
        assert!(report.contains("- Moderate drought risk"));
        assert!(!report.contains("AI INSIGHT"));
    }

    #[test]
    fn test_report_includes_accepted_insight() {
        let renderer = ReportRenderer::new().unwrap();
        let f = field();
        let report = renderer
            .render_field_report(
                &f,
                &analysis(
                    &f,
                    Some(InsightSummary {
                        narrative: "Moderate drought pressure expected.".to_string(),
                        recommendation: "Schedule irrigation.".to_string(),
                        confidence: 0.92,
                    }),
                ),
            )
            .unwrap();

        assert!(report.contains("AI INSIGHT (confidence 92%)"));
        assert!(report.contains("Moderate drought pressure expected."));
    }

    #[test]
    fn test_unavailable_report() {
        let renderer = ReportRenderer::new().unwrap();
        let f = field();
        let report = renderer
            .render_unavailable(&f, "All satellite providers unavailable")
            .unwrap();

        assert!(report.contains("Status: DATA UNAVAILABLE"));
        assert!(report.contains("All satellite providers unavailable"));
        assert!(report.contains(&f.report_id()));
    }

    #[test]
    fn test_empty_crop_gets_default() {
        let renderer = ReportRenderer::new().unwrap();
        let f = FieldContext::new("Plot", 10.0, 10.0, 5.0, "").unwrap();
        let report = renderer.render_field_report(&f, &analysis(&f, None)).unwrap();
        assert!(report.contains("Crop: Not specified"));
    }
}
