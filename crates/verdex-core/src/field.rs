//! Registered farmland fields.
//!
//! A `FieldContext` is created once at registration time and is read-only
//! afterwards. Coordinate and acreage ranges are enforced at construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::VerdexError;

/// An immutable record describing a farmland field under analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldContext {
    /// Unique field identifier
    pub id: Uuid,

    /// Display name given at registration
    pub name: String,

    /// Latitude in degrees, [-90, 90]
    pub latitude: f64,

    /// Longitude in degrees, [-180, 180]
    pub longitude: f64,

    /// Field area in acres, > 0
    pub acres: f64,

    /// Crop type label (free text)
    pub crop_type: String,

    /// Registration timestamp
    pub created_at: DateTime<Utc>,
}

impl FieldContext {
    /// Register a new field, validating coordinate and acreage ranges
    pub fn new(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        acres: f64,
        crop_type: impl Into<String>,
    ) -> Result<Self, VerdexError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(VerdexError::FieldError(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(VerdexError::FieldError(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }
        if !acres.is_finite() || acres <= 0.0 {
            return Err(VerdexError::FieldError(format!(
                "acres {} must be positive",
                acres
            )));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            latitude,
            longitude,
            acres,
            crop_type: crop_type.into(),
            created_at: Utc::now(),
        })
    }

    /// Short report identifier, e.g. "FLD-1a2b3c4d"
    pub fn report_id(&self) -> String {
        let hex = self.id.simple().to_string();
        format!("FLD-{}", &hex[..8])
    }
}
