//! Venue and submission errors.

/// Errors from transaction submission and simulation.
#[derive(Debug, thiserror::Error)]
pub enum VenueError {
    /// The ledger rejected the transaction. Fatal for this transaction
    /// only; the execution log is attached because the top-level error is
    /// usually too generic to diagnose.
    #[error("transaction rejected: {reason} ({} log lines)", logs.len())]
    SubmissionRejected {
        /// The ledger's error string.
        reason: String,
        /// The execution log retrieved alongside the rejection.
        logs: Vec<String>,
    },

    /// The amount pipeline could not produce or validate a payload.
    /// Fatal to the current operation, not to the process.
    #[error("encoding error: {reason}")]
    Encoding {
        /// What failed to encode or validate.
        reason: String,
    },

    /// Transport-level failure reaching the venue.
    #[error("venue transport error: {reason}")]
    Transport {
        /// Human-readable transport failure.
        reason: String,
    },
}
