//! # Check Results & Compatibility Report
//!
//! Structured output of the verification harness. Every probe produces a
//! [`CheckResult`]; the aggregated [`CompatibilityReport`] carries all of
//! them plus the venue the stack may actually use. Failures are data, not
//! errors — a report with failed checks is a successful verification run.

use serde::{Deserialize, Serialize};

use veil_venue::Venue;

/// The stack layer a check belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckLayer {
    /// Compressed account state and inclusion proofs.
    Compression,
    /// The encryption service and ciphertext handling.
    Encryption,
    /// The delegated permissioned execution venue.
    DelegatedExecution,
}

impl CheckLayer {
    /// Stable lowercase name for log lines and serialized reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compression => "compression",
            Self::Encryption => "encryption",
            Self::DelegatedExecution => "delegated_execution",
        }
    }
}

impl std::fmt::Display for CheckLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pass/fail verdict of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    Pass,
    Fail,
}

impl CheckStatus {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// One verification check's outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// The layer the check probes.
    pub layer: CheckLayer,
    /// Stable check name, unique within its layer.
    pub name: String,
    /// Verdict.
    pub status: CheckStatus,
    /// Human-readable observation, present on pass and fail alike.
    pub detail: String,
    /// The underlying error payload, failures only.
    pub error: Option<String>,
}

impl CheckResult {
    /// A passing check.
    pub fn pass(layer: CheckLayer, name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            layer,
            name: name.into(),
            status: CheckStatus::Pass,
            detail: detail.into(),
            error: None,
        }
    }

    /// A failing check with its error payload.
    pub fn fail(
        layer: CheckLayer,
        name: &'static str,
        detail: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            layer,
            name: name.into(),
            status: CheckStatus::Fail,
            detail: detail.into(),
            error: Some(error.into()),
        }
    }

    /// A check that could not be evaluated because an earlier check in
    /// its layer failed. Recorded as a failure so the report never
    /// silently drops a checklist entry.
    pub fn dependent(layer: CheckLayer, name: &'static str, blocked_on: &'static str) -> Self {
        Self {
            layer,
            name: name.into(),
            status: CheckStatus::Fail,
            detail: "not evaluated".into(),
            error: Some(format!("blocked by failed check `{blocked_on}`")),
        }
    }
}

/// Aggregated verification outcome across all three layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityReport {
    /// Every check, in the order it ran.
    pub checks: Vec<CheckResult>,
    /// The venue the stack may use: `Delegated` only when the end-to-end
    /// simulated swap passed on the delegated venue, otherwise `Base`.
    pub venue: Venue,
}

impl CompatibilityReport {
    /// Look up a check by name.
    pub fn check(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }

    /// Whether every check in a layer passed (vacuously false for a
    /// layer with no checks).
    pub fn layer_passed(&self, layer: CheckLayer) -> bool {
        let mut any = false;
        for check in self.checks.iter().filter(|c| c.layer == layer) {
            any = true;
            if !check.status.is_pass() {
                return false;
            }
        }
        any
    }

    /// The failed checks, in run order.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| !c.status.is_pass())
    }

    /// Whether the delegated venue is usable.
    pub fn delegated_compatible(&self) -> bool {
        self.venue == Venue::Delegated
    }

    /// One line per check plus the venue verdict, for operator output.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for check in &self.checks {
            let status = if check.status.is_pass() { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "[{status}] {}/{}: {}\n",
                check.layer, check.name, check.detail
            ));
        }
        out.push_str(&format!("venue: {}\n", self.venue));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass(layer: CheckLayer, name: &'static str) -> CheckResult {
        CheckResult::pass(layer, name, "ok")
    }

    #[test]
    fn layer_verdict_requires_every_check() {
        let report = CompatibilityReport {
            checks: vec![
                pass(CheckLayer::Compression, "a"),
                CheckResult::fail(CheckLayer::Compression, "b", "bad", "boom"),
                pass(CheckLayer::Encryption, "c"),
            ],
            venue: Venue::Base,
        };
        assert!(!report.layer_passed(CheckLayer::Compression));
        assert!(report.layer_passed(CheckLayer::Encryption));
        assert!(!report.layer_passed(CheckLayer::DelegatedExecution));
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn dependent_failure_names_its_blocker() {
        let result = CheckResult::dependent(CheckLayer::Compression, "proof", "exists");
        assert!(!result.status.is_pass());
        assert!(result.error.as_deref().unwrap().contains("exists"));
    }

    #[test]
    fn summary_lists_every_check_and_the_venue() {
        let report = CompatibilityReport {
            checks: vec![pass(CheckLayer::Encryption, "shape")],
            venue: Venue::Delegated,
        };
        let summary = report.summary();
        assert!(summary.contains("[PASS] encryption/shape"));
        assert!(summary.contains("venue: delegated"));
    }

    #[test]
    fn report_serializes_with_stable_layer_names() {
        let report = CompatibilityReport {
            checks: vec![pass(CheckLayer::DelegatedExecution, "auth")],
            venue: Venue::Base,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("delegated_execution"));
        assert!(json.contains("PASS"));
    }
}
