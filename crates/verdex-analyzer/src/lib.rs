//! Verdex Analyzer: measured-data risk analysis with gated AI insight
//!
//! The pipeline for one field: compose a sensor snapshot from collector
//! readings, compute the measured-data analysis, optionally ask the insight
//! model, and attach its output only after the validator accepts it.

pub mod analyzer;
pub mod insight;
pub mod prompt;

pub use analyzer::{
    basic_analysis, AnalysisKind, Analyzer, DataSources, FieldAnalysis, InsightSummary,
    RiskBreakdown, INSIGHT_FALLBACK_NOTE,
};
pub use insight::{extract_json, parse_response, GeminiModel, InsightModel, StubModel};
pub use prompt::PromptBuilder;
