//! Validation verdicts
//!
//! The outcome of gating one AI response: accepted or rejected, with the
//! violated rules and a confidence score.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a rule breach
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationSeverity {
    /// Lowers confidence without forcing rejection
    Soft = 0,
    /// Forces rejection regardless of other factors
    Hard = 1,
}

/// A specific rule breach found while validating a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Stable rule identifier, e.g. "ndvi_out_of_bounds"
    pub rule: String,

    /// Field the rule checked
    pub field: String,

    /// The bound the value was expected to satisfy
    pub expected: String,

    /// The value actually observed
    pub observed: String,

    /// Whether the breach forces rejection
    pub severity: ViolationSeverity,
}

impl Violation {
    /// Create a hard violation
    pub fn hard(
        rule: impl Into<String>,
        field: impl Into<String>,
        expected: impl Into<String>,
        observed: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            field: field.into(),
            expected: expected.into(),
            observed: observed.into(),
            severity: ViolationSeverity::Hard,
        }
    }

    /// Create a soft violation
    pub fn soft(
        rule: impl Into<String>,
        field: impl Into<String>,
        expected: impl Into<String>,
        observed: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            field: field.into(),
            expected: expected.into(),
            observed: observed.into(),
            severity: ViolationSeverity::Soft,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {} expected {}, observed {}",
            self.rule, self.field, self.expected, self.observed
        )
    }
}

/// The result of validating one AI response against its sensor snapshot.
///
/// `violations` holds hard violations only and is empty exactly when the
/// response is accepted; soft findings are carried in `warnings` and lower
/// the confidence score without forcing rejection. Verdicts are immutable
/// once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    /// Whether the response is safe to surface to a user
    pub accepted: bool,

    /// Hard violations, in check declaration order; empty iff accepted
    pub violations: Vec<Violation>,

    /// Soft findings that lowered confidence
    pub warnings: Vec<Violation>,

    /// Confidence in the accepted response, [0, 1]; 0.0 when rejected
    pub confidence: f64,
}

impl ValidationVerdict {
    /// Create an accepting verdict
    pub fn accept(confidence: f64, warnings: Vec<Violation>) -> Self {
        Self {
            accepted: true,
            violations: Vec::new(),
            warnings,
            confidence,
        }
    }

    /// Create a rejecting verdict; confidence is fixed at 0.0
    pub fn reject(violations: Vec<Violation>, warnings: Vec<Violation>) -> Self {
        Self {
            accepted: false,
            violations,
            warnings,
            confidence: 0.0,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Identifiers of the violated rules, in declaration order
    pub fn violated_rules(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.rule.as_str()).collect()
    }

    /// Whether a specific rule was violated
    pub fn violates(&self, rule: &str) -> bool {
        self.violations.iter().any(|v| v.rule == rule)
    }
}

impl fmt::Display for ValidationVerdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.accepted {
            write!(f, "ACCEPT (confidence {:.3})", self.confidence)?;
            if !self.warnings.is_empty() {
                write!(f, " with {} warning(s)", self.warnings.len())?;
            }
            Ok(())
        } else {
            let rules: Vec<&str> = self.violated_rules();
            write!(f, "REJECT: {}", rules.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_verdict() {
        let verdict = ValidationVerdict::accept(0.9, vec![]);
        assert!(verdict.is_accepted());
        assert!(verdict.violations.is_empty());
        assert_eq!(verdict.confidence, 0.9);
    }

    #[test]
    fn test_reject_verdict() {
        let verdict = ValidationVerdict::reject(
            vec![Violation::hard("ndvi_out_of_bounds", "ndvi", "[-1, 1]", "5")],
            vec![],
        );
        assert!(!verdict.is_accepted());
        assert_eq!(verdict.confidence, 0.0);
        assert!(verdict.violates("ndvi_out_of_bounds"));
        assert_eq!(verdict.violated_rules(), vec!["ndvi_out_of_bounds"]);
    }

    #[test]
    fn test_display() {
        let verdict = ValidationVerdict::accept(0.85, vec![]);
        assert_eq!(format!("{}", verdict), "ACCEPT (confidence 0.850)");

        let verdict = ValidationVerdict::reject(
            vec![Violation::hard("temperature_out_of_bounds", "temperature", "[-70, 60]", "200")],
            vec![],
        );
        assert!(format!("{}", verdict).contains("REJECT: temperature_out_of_bounds"));
    }

    #[test]
    fn test_serialization() {
        let verdict = ValidationVerdict::reject(
            vec![Violation::hard("precipitation_negative", "precipitation", ">= 0", "-3")],
            vec![Violation::soft("ndvi_source_disagreement", "ndvi", "within 0.15", "0.2")],
        );

        let json = serde_json::to_string(&verdict).unwrap();
        let parsed: ValidationVerdict = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, verdict);
        assert_eq!(parsed.warnings[0].severity, ViolationSeverity::Soft);
    }
}
