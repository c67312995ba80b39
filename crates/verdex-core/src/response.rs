//! Untrusted AI output.
//!
//! `AiResponse` is the raw structured output of the insight model for one
//! analysis. Numeric fields arrive as `Claim`s so that "field absent" and
//! "field present but invalid" stay distinguishable at the type level
//! instead of collapsing into an untyped dictionary lookup.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A numeric claim made by the model
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Claim {
    /// The field was missing or null; no claim was made
    #[default]
    Absent,
    /// The field was present but not a number; the raw text is preserved
    Malformed(String),
    /// A numeric claim
    Value(f64),
}

impl Claim {
    /// The claimed number, if one was made
    pub fn value(&self) -> Option<f64> {
        match self {
            Claim::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Claim::Absent)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Claim::Malformed(_))
    }

    /// Human-readable rendering for verdicts and audit entries
    pub fn describe(&self) -> String {
        match self {
            Claim::Absent => "absent".to_string(),
            Claim::Malformed(raw) => format!("malformed: {}", raw),
            Claim::Value(v) => format!("{}", v),
        }
    }
}

impl From<f64> for Claim {
    fn from(v: f64) -> Self {
        Claim::Value(v)
    }
}

impl Serialize for Claim {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Claim::Absent => serializer.serialize_none(),
            Claim::Malformed(raw) => serializer.serialize_str(raw),
            Claim::Value(v) => serializer.serialize_f64(*v),
        }
    }
}

impl<'de> Deserialize<'de> for Claim {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::Null => Claim::Absent,
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(v) => Claim::Value(v),
                None => Claim::Malformed(n.to_string()),
            },
            serde_json::Value::String(s) => Claim::Malformed(s),
            other => Claim::Malformed(other.to_string()),
        })
    }
}

/// Raw structured output of the insight model for one analysis.
///
/// Treated as untrusted input: every instance must pass through the output
/// validator before it reaches a user or a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AiResponse {
    /// Claimed mean NDVI
    #[serde(default)]
    pub ndvi: Claim,

    /// Claimed temperature in degrees Celsius
    #[serde(default, rename = "temperature")]
    pub temperature_c: Claim,

    /// Claimed precipitation in millimetres
    #[serde(default, rename = "precipitation")]
    pub precipitation_mm: Claim,

    /// Free-text recommendation
    #[serde(default)]
    pub recommendation: String,

    /// Free-text risk narrative
    #[serde(default)]
    pub narrative: String,
}
