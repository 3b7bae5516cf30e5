//! # Pool Data Model
//!
//! The client-side view of a confidential liquidity pool: a mint pair,
//! an authority, a fee, and ciphertext balance slots. The on-ledger pool
//! record is compressed state owned by the swap program; this crate only
//! models the fields a coordinating client needs.
//!
//! ## Mint Ordering
//!
//! Pool addresses are derived from the ordered `(mint_a, mint_b)` tuple,
//! and swapping the mints yields a *different* address. Normalization is
//! a caller-side policy, not a derivation-layer concern: [`MintPair`]
//! sorts the pair byte-wise exactly once, at construction, so every later
//! derivation sees the same ordering.

use serde::{Deserialize, Serialize};

use crate::ciphertext::Ciphertext;
use crate::error::ValidationError;
use crate::id::{AccountId, MintId};

/// Maximum pool fee, in basis points.
pub const MAX_FEE_BPS: u16 = 10_000;

/// An ordered pair of distinct mints, normalized byte-wise at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MintPair {
    mint_a: MintId,
    mint_b: MintId,
}

impl MintPair {
    /// Build a normalized pair: the byte-wise smaller mint becomes
    /// `mint_a`. Rejects identical mints.
    pub fn normalized(x: MintId, y: MintId) -> Result<Self, ValidationError> {
        if x == y {
            return Err(ValidationError::DuplicateMint {
                mint: x.to_string(),
            });
        }
        let (mint_a, mint_b) = if x.as_bytes() <= y.as_bytes() {
            (x, y)
        } else {
            (y, x)
        };
        Ok(Self { mint_a, mint_b })
    }

    /// The first mint in normalized order.
    pub fn mint_a(&self) -> MintId {
        self.mint_a
    }

    /// The second mint in normalized order.
    pub fn mint_b(&self) -> MintId {
        self.mint_b
    }
}

/// Static pool configuration fixed at initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// The normalized mint pair this pool trades.
    pub mints: MintPair,
    /// The pool authority principal.
    pub authority: AccountId,
    /// Swap fee in basis points, at most [`MAX_FEE_BPS`].
    pub fee_bps: u16,
}

impl PoolConfig {
    /// Validate and construct a pool configuration.
    pub fn new(mints: MintPair, authority: AccountId, fee_bps: u16) -> Result<Self, ValidationError> {
        if fee_bps > MAX_FEE_BPS {
            return Err(ValidationError::FeeOutOfRange { fee_bps });
        }
        Ok(Self {
            mints,
            authority,
            fee_bps,
        })
    }
}

/// The client-side pool model: configuration plus ciphertext value slots.
///
/// Reserve and protocol-fee slots are opaque — "no value" and "encrypted
/// zero" are distinguishable only by the service holding the decryption
/// capability. The pool also carries an admin pause flag and the ledger
/// timestamp of its last mutation, both plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool {
    /// Static configuration.
    pub config: PoolConfig,
    /// Encrypted reserve of mint A.
    pub reserve_a: Ciphertext,
    /// Encrypted reserve of mint B.
    pub reserve_b: Ciphertext,
    /// Encrypted accumulated protocol fee in mint A.
    pub protocol_fee_a: Ciphertext,
    /// Encrypted accumulated protocol fee in mint B.
    pub protocol_fee_b: Ciphertext,
    /// Admin pause flag: a paused pool rejects liquidity and swap
    /// instructions on-ledger.
    pub is_paused: bool,
    /// Ledger timestamp of the last state mutation (unix seconds).
    pub last_update_ts: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mint(byte: u8) -> MintId {
        MintId::new([byte; 32])
    }

    #[test]
    fn mint_pair_normalizes_ordering() {
        let forward = MintPair::normalized(mint(1), mint(2)).unwrap();
        let reversed = MintPair::normalized(mint(2), mint(1)).unwrap();
        assert_eq!(forward, reversed);
        assert_eq!(forward.mint_a(), mint(1));
        assert_eq!(forward.mint_b(), mint(2));
    }

    #[test]
    fn mint_pair_rejects_identical_mints() {
        let err = MintPair::normalized(mint(5), mint(5)).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateMint { .. }));
    }

    #[test]
    fn pool_config_accepts_max_fee() {
        let mints = MintPair::normalized(mint(1), mint(2)).unwrap();
        let config = PoolConfig::new(mints, AccountId::new([9u8; 32]), MAX_FEE_BPS);
        assert!(config.is_ok());
    }

    #[test]
    fn pool_config_rejects_fee_above_max() {
        let mints = MintPair::normalized(mint(1), mint(2)).unwrap();
        let err = PoolConfig::new(mints, AccountId::new([9u8; 32]), MAX_FEE_BPS + 1).unwrap_err();
        assert!(matches!(err, ValidationError::FeeOutOfRange { fee_bps } if fee_bps == 10_001));
    }
}
