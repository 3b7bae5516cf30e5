//! Validation errors for core domain primitives.

/// Errors raised when constructing core domain values from raw input.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A hex-encoded identifier had the wrong length or invalid characters.
    #[error("invalid {kind} identifier: {reason}")]
    InvalidIdentifier {
        /// Which identifier type rejected the input.
        kind: &'static str,
        /// Human-readable reason for the rejection.
        reason: String,
    },

    /// A pool fee outside the permitted basis-point range.
    #[error("fee_bps {fee_bps} exceeds maximum 10000")]
    FeeOutOfRange {
        /// The rejected fee in basis points.
        fee_bps: u16,
    },

    /// A pool was configured with the same mint on both sides.
    #[error("pool mints must be distinct: {mint}")]
    DuplicateMint {
        /// The duplicated mint, hex-encoded.
        mint: String,
    },
}
