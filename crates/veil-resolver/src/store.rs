//! The compressed-state storage capability.

use veil_core::{ContentHash, ProgramId};

use crate::error::ResolveError;
use crate::types::{CompressedAccountRecord, InclusionProof};

/// Read-only query interface over the compressed-state storage layer.
///
/// The veil core depends only on this trait; concrete backends (the HTTP
/// indexer client in `veil-client`, in-memory fakes in tests) implement
/// it. Both operations are side-effect-free reads — each call observes
/// the storage layer at that moment, and results go stale as the trees
/// advance.
pub trait CompressedStateStore: Send + Sync {
    /// All compressed accounts currently owned by `program`.
    fn accounts_by_owner(
        &self,
        program: ProgramId,
    ) -> impl std::future::Future<Output = Result<Vec<CompressedAccountRecord>, ResolveError>> + Send;

    /// Inclusion proofs for the given content hashes, in input order.
    ///
    /// A hash that was superseded since resolution yields
    /// [`ResolveError::ProofUnavailable`].
    fn proofs_for(
        &self,
        hashes: &[ContentHash],
    ) -> impl std::future::Future<Output = Result<Vec<InclusionProof>, ResolveError>> + Send;
}
