//! Audit trail
//!
//! Every validation appends one entry to a caller-owned sink, recording the
//! rules applied, the bounds checked, and the outcome. The log itself is
//! append-only; ownership belongs to the caller, not the validator.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::verdict::ValidationVerdict;

/// The outcome of one rule application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRecord {
    /// Rule identifier
    pub rule: String,
    /// Field checked
    pub field: String,
    /// Expected bound
    pub expected: String,
    /// Observed value
    pub observed: String,
    /// Whether the check passed
    pub passed: bool,
}

/// One audit log entry, produced per validation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry ID
    pub id: String,

    /// Timestamp (Unix ms)
    pub timestamp: u64,

    /// Operation being audited
    pub operation: String,

    /// Whether the response was accepted
    pub accepted: bool,

    /// Confidence carried by the verdict
    pub confidence: f64,

    /// Outcomes of every rule applied, in declaration order
    pub checks: Vec<CheckRecord>,

    /// Identifiers of the violated rules
    #[serde(default)]
    pub violations: Vec<String>,
}

impl AuditEntry {
    /// Build an entry from a verdict and the checks that produced it
    pub fn from_verdict(
        operation: impl Into<String>,
        verdict: &ValidationVerdict,
        checks: Vec<CheckRecord>,
    ) -> Self {
        Self {
            id: generate_audit_id(),
            timestamp: current_timestamp(),
            operation: operation.into(),
            accepted: verdict.accepted,
            confidence: verdict.confidence,
            checks,
            violations: verdict
                .violations
                .iter()
                .map(|v| v.rule.clone())
                .collect(),
        }
    }
}

/// A destination for audit entries.
///
/// The validator appends through this trait; callers decide where entries
/// land (an in-process log, a shared log, an external store). Sinks must be
/// `Send` so a validation can run inside concurrent request handlers.
pub trait AuditSink: Send {
    fn append(&mut self, entry: AuditEntry);
}

/// Append-only, process-lifetime audit log
pub struct AuditLog {
    entries: Vec<AuditEntry>,
    max_entries: usize,
}

impl AuditLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            max_entries: 10_000,
        }
    }

    /// Create with a custom retention limit
    pub fn with_max_entries(max: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max,
        }
    }

    /// All retained entries, oldest first
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Entries for rejected responses
    pub fn rejected_entries(&self) -> Vec<&AuditEntry> {
        self.entries.iter().filter(|e| !e.accepted).collect()
    }

    /// Entries since a Unix-ms timestamp
    pub fn entries_since(&self, timestamp: u64) -> Vec<&AuditEntry> {
        self.entries
            .iter()
            .filter(|e| e.timestamp >= timestamp)
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Export to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }

    /// Export to JSON Lines
    pub fn to_jsonl(&self) -> String {
        self.entries
            .iter()
            .filter_map(|e| serde_json::to_string(e).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Summary statistics over the retained entries
    pub fn stats(&self) -> AuditStats {
        let total = self.entries.len();
        let accepted = self.entries.iter().filter(|e| e.accepted).count();
        let rejected = total - accepted;

        AuditStats {
            total,
            accepted,
            rejected,
            rejection_rate: if total > 0 {
                rejected as f64 / total as f64
            } else {
                0.0
            },
        }
    }
}

impl AuditSink for AuditLog {
    fn append(&mut self, entry: AuditEntry) {
        self.entries.push(entry);

        if self.entries.len() > self.max_entries {
            let drain_count = self.entries.len() - self.max_entries;
            self.entries.drain(0..drain_count);
        }
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

/// An `AuditLog` safe for concurrent appenders.
///
/// Clones share the same underlying log; appends are serialized by a single
/// writer lock.
#[derive(Clone)]
pub struct SharedAuditLog {
    inner: Arc<Mutex<AuditLog>>,
}

impl SharedAuditLog {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(AuditLog::new())),
        }
    }

    /// Run a closure against the underlying log
    pub fn with<R>(&self, f: impl FnOnce(&AuditLog) -> R) -> R {
        f(&self.lock())
    }

    pub fn stats(&self) -> AuditStats {
        self.lock().stats()
    }

    pub fn to_jsonl(&self) -> String {
        self.lock().to_jsonl()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AuditLog> {
        // A poisoned log is still appendable
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl AuditSink for SharedAuditLog {
    fn append(&mut self, entry: AuditEntry) {
        self.lock().append(entry);
    }
}

impl Default for SharedAuditLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about audit entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditStats {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub rejection_rate: f64,
}

fn generate_audit_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let timestamp = current_timestamp();
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("aud_{:x}_{:04x}", timestamp, counter % 0xFFFF)
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
