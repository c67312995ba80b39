//! Confidence scoring
//!
//! Scores how trustworthy an accepted response is, from three independently
//! weighted sub-scores: agreement with the sensor snapshot (0.5), agreement
//! with historical location patterns (0.3), and internal coherence of the
//! narrative (0.2). Scores are exactly reproducible for identical inputs.

use verdex_core::{AiResponse, SensorSnapshot};

use crate::config::ValidatorConfig;
use crate::verdict::{Violation, ViolationSeverity};

/// Weight of the source-agreement sub-score
pub const AGREEMENT_WEIGHT: f64 = 0.5;
/// Weight of the historical-pattern sub-score
pub const HISTORY_WEIGHT: f64 = 0.3;
/// Weight of the narrative-coherence sub-score
pub const COHERENCE_WEIGHT: f64 = 0.2;

/// Source of historical/location-pattern agreement.
///
/// Implementations must not error: when no history is wired in, return a
/// neutral value.
pub trait HistoryProvider: Send + Sync {
    /// Agreement of the claimed NDVI with historical patterns for the
    /// snapshot's location and season, in [0, 1]
    fn pattern_agreement(&self, snapshot: &SensorSnapshot, claimed_ndvi: f64) -> f64;
}

/// Default history source: no data, neutral agreement
pub struct NoHistory;

impl HistoryProvider for NoHistory {
    fn pattern_agreement(&self, _snapshot: &SensorSnapshot, _claimed_ndvi: f64) -> f64 {
        1.0
    }
}

/// Computes confidence scores for validated responses
pub struct ConfidenceScorer {
    config: ValidatorConfig,
    history: Box<dyn HistoryProvider>,
}

impl ConfidenceScorer {
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            config,
            history: Box::new(NoHistory),
        }
    }

    /// Use a real history source instead of the neutral default
    pub fn with_history(mut self, history: Box<dyn HistoryProvider>) -> Self {
        self.history = history;
        self
    }

    /// Score a response in [0, 1]. Responses carrying any hard violation
    /// score 0.0: confidence is only meaningful for accepted output.
    pub fn score(
        &self,
        response: &AiResponse,
        snapshot: &SensorSnapshot,
        violations: &[Violation],
    ) -> f64 {
        if violations
            .iter()
            .any(|v| v.severity == ViolationSeverity::Hard)
        {
            return 0.0;
        }

        let agreement = self.agreement_score(response, snapshot);
        let history = self.history_score(response, snapshot);
        let coherence = self.coherence_score(response, violations);

        (agreement + history + coherence).clamp(0.0, 1.0)
    }

    /// Up to `AGREEMENT_WEIGHT`, decreasing linearly as the claimed NDVI
    /// drifts from the measured one, reaching 0 at the hard tolerance. An
    /// absent claim pays half weight: agreement cannot be measured.
    fn agreement_score(&self, response: &AiResponse, snapshot: &SensorSnapshot) -> f64 {
        match response.ndvi.value() {
            Some(claimed) => {
                let diff = (claimed - snapshot.mean_ndvi).abs();
                let falloff = 1.0 - diff / self.config.hard_ndvi_tolerance;
                AGREEMENT_WEIGHT * falloff.clamp(0.0, 1.0)
            }
            None => AGREEMENT_WEIGHT * 0.5,
        }
    }

    fn history_score(&self, response: &AiResponse, snapshot: &SensorSnapshot) -> f64 {
        let ndvi = response.ndvi.value().unwrap_or(snapshot.mean_ndvi);
        HISTORY_WEIGHT * self.history.pattern_agreement(snapshot, ndvi).clamp(0.0, 1.0)
    }

    /// Up to `COHERENCE_WEIGHT`: zero for an empty narrative or one that
    /// restates a value flagged by a hard violation, half weight for a
    /// highly repetitive narrative.
    fn coherence_score(&self, response: &AiResponse, violations: &[Violation]) -> f64 {
        let narrative = response.narrative.trim();
        if narrative.is_empty() {
            return 0.0;
        }

        let restates_violation = violations
            .iter()
            .filter(|v| v.severity == ViolationSeverity::Hard)
            .any(|v| narrative.contains(&v.observed));
        if restates_violation {
            return 0.0;
        }

        if is_repetitive(narrative) {
            return COHERENCE_WEIGHT * 0.5;
        }

        COHERENCE_WEIGHT
    }
}

/// A narrative of eight or more words where fewer than 30% are distinct
fn is_repetitive(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() < 8 {
        return false;
    }

    let unique: std::collections::HashSet<String> =
        words.iter().map(|w| w.to_lowercase()).collect();
    (unique.len() as f64) / (words.len() as f64) < 0.3
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdex_core::{Claim, DroughtRisk};

    fn snapshot(ndvi: f64) -> SensorSnapshot {
        SensorSnapshot {
            mean_ndvi: ndvi,
            temperature_c: 22.0,
            precipitation_mm: 30.0,
            drought_risk: DroughtRisk::Low,
            satellite_source: "test".to_string(),
            weather_source: "test".to_string(),
            observed_at: chrono::Utc::now(),
        }
    }

    fn response(ndvi: Claim, narrative: &str) -> AiResponse {
        AiResponse {
            ndvi,
            temperature_c: Claim::Value(22.0),
            precipitation_mm: Claim::Value(30.0),
            recommendation: String::new(),
            narrative: narrative.to_string(),
        }
    }

    #[test]
    fn test_close_agreement_scores_high() {
        let scorer = ConfidenceScorer::new(ValidatorConfig::standard());
        let score = scorer.score(
            &response(Claim::Value(0.52), "Healthy crop."),
            &snapshot(0.50),
            &[],
        );
        assert!(score >= 0.8, "score was {}", score);
    }

    #[test]
    fn test_hard_violation_scores_zero() {
        let scorer = ConfidenceScorer::new(ValidatorConfig::standard());
        let violations = vec![Violation::hard("ndvi_out_of_bounds", "ndvi", "[-1, 1]", "5")];
        let score = scorer.score(
            &response(Claim::Value(5.0), "..."),
            &snapshot(0.50),
            &violations,
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_monotone_in_disagreement() {
        let scorer = ConfidenceScorer::new(ValidatorConfig::standard());
        let base = snapshot(0.50);

        let mut previous = f64::INFINITY;
        for claimed in [0.50, 0.55, 0.60, 0.65, 0.70, 0.80, 0.90] {
            let score = scorer.score(&response(Claim::Value(claimed), "Stable."), &base, &[]);
            assert!(
                score <= previous,
                "score increased at claimed={}: {} > {}",
                claimed,
                score,
                previous
            );
            previous = score;
        }
    }

    #[test]
    fn test_absent_claim_pays_half_agreement_weight() {
        let scorer = ConfidenceScorer::new(ValidatorConfig::standard());
        let absent = scorer.score(&response(Claim::Absent, "Stable."), &snapshot(0.5), &[]);
        let exact = scorer.score(&response(Claim::Value(0.5), "Stable."), &snapshot(0.5), &[]);
        assert!(absent < exact);
        assert!((absent - (0.25 + 0.3 + 0.2)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_narrative_loses_coherence() {
        let scorer = ConfidenceScorer::new(ValidatorConfig::standard());
        let with_text = scorer.score(&response(Claim::Value(0.5), "Stable."), &snapshot(0.5), &[]);
        let without = scorer.score(&response(Claim::Value(0.5), "   "), &snapshot(0.5), &[]);
        assert!((with_text - without - COHERENCE_WEIGHT).abs() < 1e-9);
    }

    #[test]
    fn test_repetitive_narrative_penalized() {
        let scorer = ConfidenceScorer::new(ValidatorConfig::standard());
        let repetitive = "risk risk risk risk risk risk risk risk risk risk";
        let score_rep = scorer.score(&response(Claim::Value(0.5), repetitive), &snapshot(0.5), &[]);
        let score_ok = scorer.score(
            &response(Claim::Value(0.5), "Moderate drought pressure expected this season."),
            &snapshot(0.5),
            &[],
        );
        assert!(score_rep < score_ok);
    }

    #[test]
    fn test_deterministic() {
        let scorer = ConfidenceScorer::new(ValidatorConfig::standard());
        let r = response(Claim::Value(0.57), "Mild stress in the north section.");
        let s = snapshot(0.50);
        assert_eq!(scorer.score(&r, &s, &[]), scorer.score(&r, &s, &[]));
    }
}
