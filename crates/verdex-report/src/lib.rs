//! Verdex Report: plain-text verification reports
//!
//! Renders accepted analyses into the field verification report, and a
//! clearly labeled unavailable-data report when the pipeline could not
//! produce one.

pub mod renderer;
pub mod templates;

pub use renderer::ReportRenderer;
pub use templates::{FIELD_REPORT_TEMPLATE, UNAVAILABLE_TEMPLATE};
