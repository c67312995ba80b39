//! Verdex Collectors: satellite and weather data with ordered fallback
//!
//! Each collector owns a chain of providers tried in order of reliability.
//! Networked providers fail soft (logged at warn, chain moves on); every
//! chain ends in a deterministic model so an answer is always available,
//! tagged with its source and a low reading confidence. Collectors
//! guarantee their outputs are fully populated before the validator ever
//! sees them.

pub mod satellite;
pub mod weather;

pub use satellite::{
    solar_ndvi_estimate, LandViewerProvider, OpenMeteoVegetationProvider, SatelliteCollector,
    SolarClimateModel, VegetationProvider,
};
pub use weather::{
    climate_estimate, risk_from_daily, LatitudeClimateModel, NasaPowerProvider,
    OpenMeteoArchiveProvider, OpenMeteoForecastProvider, WeatherCollector, WeatherProvider,
};
