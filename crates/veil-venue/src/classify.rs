//! # Simulation-Failure Classification
//!
//! A dry-run can fail for two very different reasons:
//!
//! - the delegated venue cannot execute logic that depends on programs
//!   outside its isolated environment (it cannot clone the compression
//!   system program into its sandbox) — a **venue incompatibility**,
//!   a property of the venue configuration, not of the transaction; or
//! - the transaction itself is invalid (insufficient balance, expired
//!   proof) — a genuine business rejection.
//!
//! The verification harness leans on this distinction to report whether
//! privacy-layer composition is currently feasible at all, versus whether
//! one particular transaction was bad.

use serde::{Deserialize, Serialize};

use crate::executor::SimulationOutcome;

/// Error-payload markers identifying the venue's foreign-program-access
/// failure mode.
///
/// The markers are venue-specific strings; the defaults match the known
/// delegated-venue signature ("cannot clone" a program that lives only on
/// the base ledger). Threaded through constructors, never global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncompatibilitySignatures {
    /// Substrings of the error payload that mark an incompatibility.
    pub markers: Vec<String>,
}

impl Default for IncompatibilitySignatures {
    fn default() -> Self {
        Self {
            markers: vec!["clone".to_string(), "foreign program".to_string()],
        }
    }
}

impl IncompatibilitySignatures {
    /// Which marker, if any, the payload matches.
    pub fn matched_marker(&self, payload: &str) -> Option<&str> {
        self.markers
            .iter()
            .find(|marker| payload.contains(marker.as_str()))
            .map(String::as_str)
    }
}

/// Classified result of a dry-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationVerdict {
    /// The venue would accept the transaction.
    Pass,
    /// The venue cannot execute this class of transaction at all.
    /// Informs venue selection; not itself a hard failure.
    Incompatible {
        /// The signature marker that matched.
        marker: String,
        /// The full error payload, for the report.
        error: String,
    },
    /// The transaction itself was rejected.
    Rejected {
        /// The venue's error payload.
        error: String,
        /// Execution log lines accompanying the rejection.
        logs: Vec<String>,
    },
}

/// Classify a simulation outcome against the venue's incompatibility
/// signatures.
pub fn classify_simulation(
    outcome: &SimulationOutcome,
    signatures: &IncompatibilitySignatures,
) -> SimulationVerdict {
    let Some(error) = &outcome.err else {
        return SimulationVerdict::Pass;
    };
    if let Some(marker) = signatures.matched_marker(error) {
        tracing::debug!(marker, "simulation failure classified as venue incompatibility");
        return SimulationVerdict::Incompatible {
            marker: marker.to_string(),
            error: error.clone(),
        };
    }
    SimulationVerdict::Rejected {
        error: error.clone(),
        logs: outcome.logs.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_outcome_passes() {
        let verdict = classify_simulation(
            &SimulationOutcome::ok(),
            &IncompatibilitySignatures::default(),
        );
        assert_eq!(verdict, SimulationVerdict::Pass);
    }

    #[test]
    fn clone_failure_is_incompatibility() {
        let outcome = SimulationOutcome::failed(
            "InstructionError: failed to clone program into sandbox",
            vec![],
        );
        let verdict = classify_simulation(&outcome, &IncompatibilitySignatures::default());
        assert!(matches!(
            verdict,
            SimulationVerdict::Incompatible { ref marker, .. } if marker == "clone"
        ));
    }

    #[test]
    fn business_failure_is_rejection_with_logs() {
        let outcome = SimulationOutcome::failed(
            "InstructionError: custom program error 0x1771",
            vec!["Program log: insufficient encrypted balance".into()],
        );
        let verdict = classify_simulation(&outcome, &IncompatibilitySignatures::default());
        match verdict {
            SimulationVerdict::Rejected { logs, .. } => {
                assert_eq!(logs.len(), 1);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn custom_markers_are_honored() {
        let signatures = IncompatibilitySignatures {
            markers: vec!["sandbox escape".into()],
        };
        let outcome = SimulationOutcome::failed("sandbox escape attempt denied", vec![]);
        assert!(matches!(
            classify_simulation(&outcome, &signatures),
            SimulationVerdict::Incompatible { .. }
        ));
        // The default marker no longer matches.
        let clone_outcome = SimulationOutcome::failed("failed to clone program", vec![]);
        assert!(matches!(
            classify_simulation(&clone_outcome, &signatures),
            SimulationVerdict::Rejected { .. }
        ));
    }
}
