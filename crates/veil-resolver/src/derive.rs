//! # Deterministic Address Derivation
//!
//! A logical address is a pure one-way function of
//! `(namespace_tag, participants…)`, bound to a specific address tree and
//! owning program. Derivation happens in two stages, mirroring the
//! storage layer's own scheme:
//!
//! 1. [`derive_address_seed`] hashes the namespace tag and the ordered
//!    participant tuple into an [`AddressSeed`];
//! 2. [`derive_address`] binds that seed to a tree and a program,
//!    producing the final [`LogicalAddress`].
//!
//! ## Argument Ordering
//!
//! Participants are hashed in the order given. Swapping two participants
//! yields a different address — callers that want order-insensitive
//! addressing (pool mint pairs) must normalize *before* deriving; see
//! `veil_core::MintPair`.
//!
//! ## Scheme Versioning
//!
//! The storage layer has shipped two derivation generations. Which one a
//! client targets is an explicit [`AddressScheme`] value threaded through
//! constructors — never a process-global switch mutated at startup.

use sha2::{Digest, Sha256};

use veil_core::{AccountId, LogicalAddress, ProgramId, TreeId};

/// Address derivation generation of the compressed-state layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressScheme {
    /// Original per-tree address space.
    Legacy,
    /// Batched address trees. Current default.
    #[default]
    Batched,
}

impl AddressScheme {
    /// Domain-separation prefix mixed into the final hash.
    fn domain_tag(&self) -> &'static [u8] {
        match self {
            Self::Legacy => b"veil:addr:v1",
            Self::Batched => b"veil:addr:v2",
        }
    }
}

/// Intermediate seed: the namespace tag and participant tuple, hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressSeed([u8; 32]);

impl AddressSeed {
    /// Access the seed bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Hash a namespace tag and an ordered participant tuple into a seed.
///
/// Every field is length-prefixed before hashing so that distinct input
/// tuples cannot produce colliding byte streams by boundary shifting
/// (`("ab", "c")` vs `("a", "bc")`).
pub fn derive_address_seed(namespace_tag: &[u8], participants: &[AccountId]) -> AddressSeed {
    let mut hasher = Sha256::new();
    hasher.update(b"veil:seed");
    hasher.update((namespace_tag.len() as u64).to_le_bytes());
    hasher.update(namespace_tag);
    hasher.update((participants.len() as u64).to_le_bytes());
    for participant in participants {
        hasher.update(participant.as_bytes());
    }
    AddressSeed(hasher.finalize().into())
}

/// Bind a seed to an address tree and an owning program, yielding the
/// final logical address.
///
/// Pure: identical inputs always yield the identical address, across
/// calls and across processes.
pub fn derive_address(
    seed: AddressSeed,
    tree: TreeId,
    program: ProgramId,
    scheme: AddressScheme,
) -> LogicalAddress {
    let mut hasher = Sha256::new();
    hasher.update(scheme.domain_tag());
    hasher.update(seed.as_bytes());
    hasher.update(tree.as_bytes());
    hasher.update(program.as_bytes());
    LogicalAddress::new(hasher.finalize().into())
}
