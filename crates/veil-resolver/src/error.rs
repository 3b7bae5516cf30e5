//! Resolution errors.

use veil_core::{ContentHash, LogicalAddress};

/// Errors from address resolution and proof fetch.
///
/// `NotFound` and `ProofUnavailable` are recoverable: the caller retries
/// *resolution* (the account may not exist yet, or its hash may have been
/// superseded by a concurrent update) — never the derivation, which is
/// pure and cannot fail differently on retry.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No record owned by the program matches the derived address.
    #[error("no compressed account at address {address}")]
    NotFound {
        /// The derived address that matched nothing.
        address: LogicalAddress,
    },

    /// The storage layer could not produce a proof for a content hash,
    /// typically because the hash was superseded after resolution.
    #[error("no inclusion proof available for content hash {hash}")]
    ProofUnavailable {
        /// The hash the proof was requested for.
        hash: ContentHash,
    },

    /// The storage backend failed to answer the query at all.
    #[error("compressed-state backend error: {reason}")]
    Backend {
        /// Human-readable backend failure description.
        reason: String,
    },
}
