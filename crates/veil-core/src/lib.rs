//! # veil-core — Shared Domain Primitives
//!
//! Identifier newtypes, the opaque [`Ciphertext`] amount representation,
//! capability flags, and the pool data model shared by every crate in the
//! veil workspace.
//!
//! ## Newtype Discipline
//!
//! Every on-ledger identifier is a distinct type — you cannot pass a
//! [`MintId`] where a [`TreeId`] is expected. All identifiers wrap the
//! 32-byte ledger key format and validate hex input at construction time.
//!
//! ## Ciphertext Opacity
//!
//! [`Ciphertext`] deliberately does not implement `PartialEq`. Encrypted
//! amounts are produced by a non-deterministic scheme: two encryptions of
//! the same plaintext are not byte-equal, so comparing ciphertexts for
//! equality is always a logic bug. Making the comparison a compile error
//! is the point.

pub mod ciphertext;
pub mod error;
pub mod flags;
pub mod id;
pub mod instruction;
pub mod pool;

pub use ciphertext::Ciphertext;
pub use error::ValidationError;
pub use flags::{CapabilityFlags, Member};
pub use id::{AccountId, ContentHash, LogicalAddress, MintId, ProgramId, QueueId, TreeId};
pub use instruction::{AccountMeta, InstructionDescriptor};
pub use pool::{MintPair, Pool, PoolConfig, MAX_FEE_BPS};
