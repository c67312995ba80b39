//! Validator thresholds
//!
//! Every numeric bound the validator applies is injectable through this
//! profile; nothing is read from the environment.

use serde::{Deserialize, Serialize};

/// Numeric thresholds for one validator instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Profile name, e.g. "standard@1.0"
    pub name: String,

    // === Physical bounds ===
    /// Valid NDVI range; outside is physically impossible
    pub ndvi_range: (f64, f64),

    /// Plausible temperature range in degrees Celsius
    pub temperature_range_c: (f64, f64),

    // === Source agreement ===
    /// Absolute NDVI disagreement that triggers a soft violation
    pub soft_ndvi_tolerance: f64,

    /// Absolute NDVI disagreement that forces rejection
    pub hard_ndvi_tolerance: f64,

    // === Acceptance ===
    /// Minimum confidence an accepted verdict must carry
    pub min_confidence: f64,

    // === Sanitizer ===
    /// Maximum length of sanitized prompt fragments
    pub max_prompt_chars: usize,
}

impl ValidatorConfig {
    /// Default thresholds
    pub fn standard() -> Self {
        Self {
            name: "standard@1.0".to_string(),
            ndvi_range: (-1.0, 1.0),
            temperature_range_c: (-70.0, 60.0),
            soft_ndvi_tolerance: 0.15,
            hard_ndvi_tolerance: 0.30,
            min_confidence: 0.5,
            max_prompt_chars: 1000,
        }
    }

    /// Tighter tolerances for reports that reach third parties
    pub fn strict() -> Self {
        Self {
            name: "strict@1.0".to_string(),
            ndvi_range: (-1.0, 1.0),
            temperature_range_c: (-50.0, 55.0),
            soft_ndvi_tolerance: 0.10,
            hard_ndvi_tolerance: 0.20,
            min_confidence: 0.7,
            max_prompt_chars: 500,
        }
    }

    /// Get a profile by mode name
    pub fn for_mode(mode: &str) -> Self {
        match mode {
            "strict" => Self::strict(),
            _ => Self::standard(),
        }
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self::standard()
    }
}
