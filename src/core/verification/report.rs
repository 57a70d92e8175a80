//! Integrity report for one author tree

use serde::{Deserialize, Serialize};

/// Result of checking every File node of a graph against the files on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Total File nodes checked
    pub total_verified: usize,

    /// Nodes whose file hashes to the recorded sha256
    pub passed: usize,

    /// Nodes with a missing file or a different hash
    pub failed: usize,

    /// Nodes without a recorded sha256
    pub skipped: usize,

    pub failures: Vec<VerificationFailure>,

    pub duration_ms: u64,
}

/// One File node that does not match its file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationFailure {
    pub node_id: String,

    pub expected_sha256: String,

    /// `None` when the file could not be read
    pub actual_sha256: Option<String>,

    pub reason: String,
}

impl VerificationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_pass(&mut self) {
        self.total_verified += 1;
        self.passed += 1;
    }

    pub fn record_failure(&mut self, failure: VerificationFailure) {
        self.total_verified += 1;
        self.failed += 1;
        self.failures.push(failure);
    }

    pub fn record_skip(&mut self) {
        self.total_verified += 1;
        self.skipped += 1;
    }

    pub fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    /// Check if all verifications passed
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Human-readable summary, one line per failure
    pub fn format_summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("🔍 Integrity check\n");
        summary.push_str(&format!("  Duration: {} ms\n", self.duration_ms));
        summary.push_str(&format!("  Files checked: {}\n", self.total_verified));
        summary.push_str(&format!("  ✅ Matched: {}\n", self.passed));
        summary.push_str(&format!("  ❌ Mismatched: {}\n", self.failed));
        summary.push_str(&format!("  ⏭️  Unhashed: {}\n", self.skipped));

        for (i, failure) in self.failures.iter().enumerate() {
            summary.push_str(&format!(
                "  {}. {}: {}\n",
                i + 1,
                failure.node_id,
                failure.reason
            ));
        }

        summary
    }
}
