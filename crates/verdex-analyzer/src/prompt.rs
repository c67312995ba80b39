//! Structural prompt composition.
//!
//! The prompt sent to the insight model is a parameterized template, never
//! string concatenation: untrusted values (field name, crop type) pass
//! through the sanitizer before interpolation, and the template fixes where
//! they can appear. This is the allowlist companion to the denylist
//! sanitizer.

use handlebars::Handlebars;
use serde_json::json;

use verdex_core::{FieldContext, RiskMetrics, VegetationReading, VerdexError};
use verdex_validator::sanitize;

const INSIGHT_TEMPLATE: &str = "\
You are assessing farmland insurance risk from measured data only.

FIELD: {{name}} ({{acres}} acres)
CROP: {{crop_type}}
LOCATION: {{latitude}}, {{longitude}}

MEASURED SATELLITE DATA:
- Mean NDVI: {{ndvi}}
- Vegetation health: {{health}}
- Reading confidence: {{reading_confidence}}

MEASURED WEATHER DATA:
- Average temperature: {{avg_temperature_c}} C
- Total rainfall: {{total_rainfall_mm}} mm
- Drought risk: {{drought_risk}}
- Flood risk: {{flood_risk}}
- Heat stress risk: {{heat_stress_risk}}

Based ONLY on this measured data, respond with valid JSON using exactly
these keys:
{\"ndvi\": <the measured NDVI>, \"temperature\": <average temperature in C>, \
\"precipitation\": <total rainfall in mm>, \
\"recommendation\": \"<2-3 specific actions>\", \
\"narrative\": \"<2-3 sentence risk analysis>\"}
";

/// Builds insight prompts from a fixed template
pub struct PromptBuilder {
    handlebars: Handlebars<'static>,
}

impl PromptBuilder {
    pub fn new() -> Result<Self, VerdexError> {
        let mut handlebars = Handlebars::new();
        // Prompts are plain text, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars
            .register_template_string("insight", INSIGHT_TEMPLATE)
            .map_err(|e| VerdexError::TemplateError(e.to_string()))?;
        Ok(Self { handlebars })
    }

    /// Compose the prompt for one analysis run
    pub fn build(
        &self,
        field: &FieldContext,
        vegetation: &VegetationReading,
        weather: &RiskMetrics,
    ) -> Result<String, VerdexError> {
        let data = json!({
            "name": sanitize::sanitize(&field.name),
            "crop_type": sanitize::sanitize(&field.crop_type),
            "acres": field.acres,
            "latitude": field.latitude,
            "longitude": field.longitude,
            "ndvi": vegetation.mean_ndvi,
            "health": vegetation.health.to_string(),
            "reading_confidence": format!("{:?}", vegetation.confidence),
            "avg_temperature_c": weather.summary.avg_temperature_c,
            "total_rainfall_mm": weather.summary.total_rainfall_mm,
            "drought_risk": weather.drought_risk,
            "flood_risk": weather.flood_risk,
            "heat_stress_risk": weather.heat_stress_risk,
        });

        self.handlebars
            .render("insight", &data)
            .map_err(|e| VerdexError::TemplateError(e.to_string()))
    }
}
