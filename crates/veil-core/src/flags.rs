//! # Capability Flags and Permission Members
//!
//! The capability bits a principal may hold on a permissioned account.
//! Flags are independent: a principal may hold any subset, and holding
//! one grants nothing about another.

use serde::{Deserialize, Serialize};

use crate::id::AccountId;

/// An unordered set of independent capability bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilityFlags(u32);

impl CapabilityFlags {
    /// May act as the account's authority.
    pub const AUTHORITY: CapabilityFlags = CapabilityFlags(1 << 0);
    /// May view transaction logs.
    pub const TX_LOGS: CapabilityFlags = CapabilityFlags(1 << 1);
    /// May view account balances.
    pub const TX_BALANCES: CapabilityFlags = CapabilityFlags(1 << 2);
    /// May view transaction messages.
    pub const TX_MESSAGE: CapabilityFlags = CapabilityFlags(1 << 3);
    /// May view account signatures.
    pub const ACCOUNT_SIGNATURES: CapabilityFlags = CapabilityFlags(1 << 4);

    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every capability bit. The member set used for swap participants:
    /// the authority, the pool signer, the venue validator, and the swap
    /// program itself all receive full observation rights.
    pub const fn all() -> Self {
        Self(
            Self::AUTHORITY.0
                | Self::TX_LOGS.0
                | Self::TX_BALANCES.0
                | Self::TX_MESSAGE.0
                | Self::ACCOUNT_SIGNATURES.0,
        )
    }

    /// Whether every bit in `other` is present in `self`.
    pub const fn contains(&self, other: CapabilityFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Union of two flag sets.
    pub const fn union(&self, other: CapabilityFlags) -> CapabilityFlags {
        CapabilityFlags(self.0 | other.0)
    }

    /// The raw bit representation, as carried in instruction data.
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Construct from raw bits. Unknown bits are preserved — forward
    /// compatibility with capability bits this client does not know about.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }
}

impl std::ops::BitOr for CapabilityFlags {
    type Output = CapabilityFlags;

    fn bitor(self, rhs: CapabilityFlags) -> CapabilityFlags {
        self.union(rhs)
    }
}

/// One principal's entry in a permission record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// The principal this entry grants capabilities to.
    pub principal: AccountId,
    /// The capability bits granted.
    pub flags: CapabilityFlags,
}

impl Member {
    /// A member holding every capability bit.
    pub fn with_all_flags(principal: AccountId) -> Self {
        Self {
            principal,
            flags: CapabilityFlags::all(),
        }
    }
}
