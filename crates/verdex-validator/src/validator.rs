//! Output validation gate.
//!
//! Decides whether one AI response is safe to surface, given the sensor
//! snapshot it was derived from. Checks run in declaration order and every
//! violation is collected, so verdicts and audit entries are reproducible.
//! Data-shape problems become violations, never errors: the only loud
//! failure left is a caller bug, which the type signatures rule out.

use verdex_core::{AiResponse, Claim, SensorSnapshot};

use crate::audit::{AuditEntry, AuditSink, CheckRecord};
use crate::config::ValidatorConfig;
use crate::confidence::{ConfidenceScorer, HistoryProvider};
use crate::verdict::{ValidationVerdict, Violation, ViolationSeverity};

/// Validates AI responses against their source snapshots
pub struct OutputValidator {
    config: ValidatorConfig,
    scorer: ConfidenceScorer,
}

impl OutputValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        let scorer = ConfidenceScorer::new(config.clone());
        Self { config, scorer }
    }

    /// Use a real history source for the pattern-agreement sub-score
    pub fn with_history(mut self, history: Box<dyn HistoryProvider>) -> Self {
        self.scorer = ConfidenceScorer::new(self.config.clone()).with_history(history);
        self
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a response, appending one entry to the caller-owned audit
    /// sink. Neither `response` nor `snapshot` is mutated.
    pub fn validate(
        &self,
        response: &AiResponse,
        snapshot: &SensorSnapshot,
        audit: &mut dyn AuditSink,
    ) -> ValidationVerdict {
        let mut checks = CheckRun::default();

        // Checks run in declaration order; identifiers are stable.
        self.check_range(
            &mut checks,
            "ndvi",
            &response.ndvi,
            self.config.ndvi_range,
            "ndvi_malformed",
            "ndvi_out_of_bounds",
        );
        self.check_range(
            &mut checks,
            "temperature",
            &response.temperature_c,
            self.config.temperature_range_c,
            "temperature_malformed",
            "temperature_out_of_bounds",
        );
        self.check_precipitation(&mut checks, &response.precipitation_mm);
        self.check_source_agreement(&mut checks, response, snapshot);

        let confidence = self.scorer.score(response, snapshot, &checks.all());

        let has_hard = checks
            .violations
            .iter()
            .any(|v| v.severity == ViolationSeverity::Hard);
        if !has_hard && confidence < self.config.min_confidence {
            checks.fail(Violation::hard(
                "confidence_below_minimum",
                "confidence",
                format!(">= {}", self.config.min_confidence),
                format!("{:.3}", confidence),
            ));
        }

        let verdict = if checks.violations.is_empty() {
            ValidationVerdict::accept(confidence, checks.warnings)
        } else {
            for violation in &checks.violations {
                tracing::warn!(%violation, "response rejected");
            }
            ValidationVerdict::reject(checks.violations, checks.warnings)
        };

        audit.append(AuditEntry::from_verdict(
            "field_analysis",
            &verdict,
            checks.records,
        ));

        verdict
    }

    /// Score a response's confidence directly. Responses carrying hard
    /// violations score 0.0.
    pub fn score_confidence(
        &self,
        response: &AiResponse,
        snapshot: &SensorSnapshot,
        violations: &[Violation],
    ) -> f64 {
        self.scorer.score(response, snapshot, violations)
    }

    fn check_range(
        &self,
        checks: &mut CheckRun,
        field: &str,
        claim: &Claim,
        range: (f64, f64),
        malformed_rule: &str,
        bounds_rule: &str,
    ) {
        let expected = format!("[{}, {}]", range.0, range.1);
        match claim {
            Claim::Absent => checks.pass(bounds_rule, field, &expected, "absent"),
            Claim::Malformed(raw) => {
                checks.fail(Violation::hard(malformed_rule, field, "a number", raw.clone()));
            }
            Claim::Value(v) => {
                if v.is_finite() && (range.0..=range.1).contains(v) {
                    checks.pass(bounds_rule, field, &expected, claim.describe());
                } else {
                    checks.fail(Violation::hard(bounds_rule, field, expected, claim.describe()));
                }
            }
        }
    }

    fn check_precipitation(&self, checks: &mut CheckRun, claim: &Claim) {
        match claim {
            Claim::Absent => checks.pass("precipitation_negative", "precipitation", ">= 0", "absent"),
            Claim::Malformed(raw) => {
                checks.fail(Violation::hard(
                    "precipitation_malformed",
                    "precipitation",
                    "a number",
                    raw.clone(),
                ));
            }
            Claim::Value(v) => {
                if v.is_finite() && *v >= 0.0 {
                    checks.pass("precipitation_negative", "precipitation", ">= 0", claim.describe());
                } else {
                    checks.fail(Violation::hard(
                        "precipitation_negative",
                        "precipitation",
                        ">= 0",
                        claim.describe(),
                    ));
                }
            }
        }
    }

    /// A claimed NDVI that materially disagrees with the measured one is a
    /// soft violation; past the hard tolerance it forces rejection. Only
    /// in-bounds claims are compared: out-of-bounds values were already
    /// rejected above.
    fn check_source_agreement(
        &self,
        checks: &mut CheckRun,
        response: &AiResponse,
        snapshot: &SensorSnapshot,
    ) {
        let claimed = match response.ndvi.value() {
            Some(v) if v.is_finite() && (self.config.ndvi_range.0..=self.config.ndvi_range.1).contains(&v) => v,
            _ => return,
        };

        let diff = (claimed - snapshot.mean_ndvi).abs();
        let observed = format!("{:.3}", diff);

        if diff > self.config.hard_ndvi_tolerance {
            checks.fail(Violation::hard(
                "ndvi_source_disagreement_severe",
                "ndvi",
                format!("within {} of measured", self.config.hard_ndvi_tolerance),
                observed,
            ));
        } else if diff > self.config.soft_ndvi_tolerance {
            checks.warn(Violation::soft(
                "ndvi_source_disagreement",
                "ndvi",
                format!("within {} of measured", self.config.soft_ndvi_tolerance),
                observed,
            ));
        } else {
            checks.pass(
                "ndvi_source_disagreement",
                "ndvi",
                &format!("within {} of measured", self.config.soft_ndvi_tolerance),
                observed,
            );
        }
    }
}

impl Default for OutputValidator {
    fn default() -> Self {
        Self::new(ValidatorConfig::standard())
    }
}

/// Accumulates check outcomes during one validation
#[derive(Default)]
struct CheckRun {
    violations: Vec<Violation>,
    warnings: Vec<Violation>,
    records: Vec<CheckRecord>,
}

impl CheckRun {
    fn pass(&mut self, rule: &str, field: &str, expected: &str, observed: impl Into<String>) {
        self.records.push(CheckRecord {
            rule: rule.to_string(),
            field: field.to_string(),
            expected: expected.to_string(),
            observed: observed.into(),
            passed: true,
        });
    }

    fn fail(&mut self, violation: Violation) {
        self.records.push(CheckRecord {
            rule: violation.rule.clone(),
            field: violation.field.clone(),
            expected: violation.expected.clone(),
            observed: violation.observed.clone(),
            passed: false,
        });
        self.violations.push(violation);
    }

    fn warn(&mut self, violation: Violation) {
        self.records.push(CheckRecord {
            rule: violation.rule.clone(),
            field: violation.field.clone(),
            expected: violation.expected.clone(),
            observed: violation.observed.clone(),
            passed: false,
        });
        self.warnings.push(violation);
    }

    fn all(&self) -> Vec<Violation> {
        let mut all = self.violations.clone();
        all.extend(self.warnings.iter().cloned());
        all
    }
}
