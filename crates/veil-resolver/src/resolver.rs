//! # Resolver — Derived Address to Proven Record
//!
//! Combines pure derivation with storage queries: derive the address,
//! find the *exactly* matching record among the program's accounts, and
//! fetch its inclusion proof.
//!
//! ## Exact-Match Requirement
//!
//! A found account is matched by byte-equality of the full 32-byte
//! address. Prefix or partial matching is forbidden — under multiple
//! similarly-prefixed accounts it silently resolves the wrong one.

use veil_core::{AccountId, LogicalAddress, MintPair, ProgramId, TreeId};

use crate::derive::{derive_address, derive_address_seed, AddressScheme};
use crate::error::ResolveError;
use crate::store::CompressedStateStore;
use crate::types::{CompressedAccountRecord, InclusionProof};

/// Namespace tag for pool accounts.
pub const POOL_TAG: &[u8] = b"pool";

/// Namespace tag for the pool's signing authority account.
pub const POOL_AUTHORITY_TAG: &[u8] = b"pool_authority";

/// A record together with the proof that authenticates it.
///
/// Both are a snapshot: the proof is bound to the record's content hash
/// and the tree root active at fetch time. Use promptly.
#[derive(Debug, Clone)]
pub struct ResolvedAccount {
    /// The current compressed account record.
    pub record: CompressedAccountRecord,
    /// The inclusion proof for `record.content_hash`.
    pub proof: InclusionProof,
}

/// Resolves derived addresses against a compressed-state store.
#[derive(Debug, Clone)]
pub struct Resolver<S> {
    store: S,
    program: ProgramId,
    address_tree: TreeId,
    scheme: AddressScheme,
}

impl<S: CompressedStateStore> Resolver<S> {
    /// Create a resolver for one program and address tree.
    ///
    /// The [`AddressScheme`] is fixed at construction and never mutated
    /// afterwards — there is no process-global scheme switch.
    pub fn new(store: S, program: ProgramId, address_tree: TreeId, scheme: AddressScheme) -> Self {
        Self {
            store,
            program,
            address_tree,
            scheme,
        }
    }

    /// The program whose accounts this resolver queries.
    pub fn program(&self) -> ProgramId {
        self.program
    }

    /// Derive the logical address for a namespace tag and participants.
    pub fn address_for(&self, tag: &[u8], participants: &[AccountId]) -> LogicalAddress {
        derive_address(
            derive_address_seed(tag, participants),
            self.address_tree,
            self.program,
            self.scheme,
        )
    }

    /// Derive the pool address for a normalized mint pair.
    pub fn pool_address(&self, mints: &MintPair) -> LogicalAddress {
        self.address_for(POOL_TAG, &[mints.mint_a().0, mints.mint_b().0])
    }

    /// Resolve an address to its current record, without a proof.
    ///
    /// Performs a full-address byte-equality scan over the program's
    /// accounts. Recoverable [`ResolveError::NotFound`] when nothing
    /// matches — the account may simply not exist yet.
    pub async fn lookup(
        &self,
        address: LogicalAddress,
    ) -> Result<CompressedAccountRecord, ResolveError> {
        let records = self.store.accounts_by_owner(self.program).await?;
        tracing::debug!(
            program = %self.program,
            candidates = records.len(),
            address = %address,
            "scanning owned compressed accounts"
        );
        records
            .into_iter()
            .find(|record| record.address == address)
            .ok_or(ResolveError::NotFound { address })
    }

    /// Resolve an address and fetch the inclusion proof for its current
    /// content hash, as one logical step.
    ///
    /// Resolution and proof-fetch belong together: a proof fetched against
    /// a record from an earlier query may already be unprovable.
    pub async fn resolve(&self, address: LogicalAddress) -> Result<ResolvedAccount, ResolveError> {
        let record = self.lookup(address).await?;
        let proof = self.proof_for(&record).await?;
        Ok(ResolvedAccount { record, proof })
    }

    /// Resolve the pool account for a normalized mint pair.
    pub async fn resolve_pool(&self, mints: &MintPair) -> Result<ResolvedAccount, ResolveError> {
        self.resolve(self.pool_address(mints)).await
    }

    /// Fetch the inclusion proof for a record's current content hash.
    pub async fn proof_for(
        &self,
        record: &CompressedAccountRecord,
    ) -> Result<InclusionProof, ResolveError> {
        let mut proofs = self.store.proofs_for(&[record.content_hash]).await?;
        if proofs.is_empty() {
            return Err(ResolveError::ProofUnavailable {
                hash: record.content_hash,
            });
        }
        Ok(proofs.swap_remove(0))
    }
}
