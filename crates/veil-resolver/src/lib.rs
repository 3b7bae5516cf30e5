//! # veil-resolver — Address Derivation & Proof Resolution
//!
//! The compression-layer entry point of the veil stack: derive the
//! deterministic logical address of a compressed account, locate its
//! current record in the storage layer, and fetch the Merkle inclusion
//! proof that authenticates it.
//!
//! ## Staleness
//!
//! Compressed accounts are superseded, never mutated in place. Every
//! state update produces a new `(content_hash, leaf_index)` pair, and a
//! proof is only valid against the tree root active when it was fetched.
//! Resolution and proof-fetch must therefore happen close to submission;
//! a cached [`ResolvedAccount`] goes stale as soon as the tree advances.

pub mod derive;
pub mod error;
pub mod resolver;
pub mod store;
pub mod types;

pub use derive::{derive_address, derive_address_seed, AddressScheme, AddressSeed};
pub use error::ResolveError;
pub use resolver::{ResolvedAccount, Resolver};
pub use store::CompressedStateStore;
pub use types::{CompressedAccountRecord, InclusionProof, TreeInfo};
