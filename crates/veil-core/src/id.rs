//! # Identifier Newtypes
//!
//! Domain-primitive newtypes for the 32-byte ledger keys used throughout
//! the veil stack. Each identifier is a distinct type so that a mint, a
//! program, and a state tree can never be confused at a call site.
//!
//! ## Validation
//!
//! Hex input is validated at construction time via [`AccountId::from_hex`];
//! deserialization routes through the same constructor so invalid values
//! are rejected at the wire boundary, not silently accepted.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A raw 32-byte ledger key.
///
/// The base type behind every identifier newtype in this crate. Displayed
/// and serialized as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId([u8; 32]);

impl AccountId {
    /// Construct from raw bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
        let raw = hex::decode(s).map_err(|e| ValidationError::InvalidIdentifier {
            kind: "account",
            reason: e.to_string(),
        })?;
        let bytes: [u8; 32] =
            raw.try_into()
                .map_err(|v: Vec<u8>| ValidationError::InvalidIdentifier {
                    kind: "account",
                    reason: format!("expected 32 bytes, got {}", v.len()),
                })?;
        Ok(Self(bytes))
    }

    /// Access the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Shortened hex form for log lines (first 8 bytes).
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl std::fmt::Debug for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountId({})", self.short())
    }
}

impl std::str::FromStr for AccountId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for AccountId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

/// Helper macro: a 32-byte identifier newtype wrapping [`AccountId`],
/// inheriting its hex parsing, display, and serde behavior.
macro_rules! ledger_key_newtype {
    ($(#[$doc:meta])* $ty:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $ty(pub AccountId);

        impl $ty {
            /// Construct from raw bytes.
            pub const fn new(bytes: [u8; 32]) -> Self {
                Self(AccountId::new(bytes))
            }

            /// Parse from a 64-character hex string.
            pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
                AccountId::from_hex(s).map(Self)
            }

            /// Access the underlying bytes.
            pub fn as_bytes(&self) -> &[u8; 32] {
                self.0.as_bytes()
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<AccountId> for $ty {
            fn from(id: AccountId) -> Self {
                Self(id)
            }
        }
    };
}

ledger_key_newtype! {
    /// A token mint identifier.
    MintId
}

ledger_key_newtype! {
    /// An on-ledger program identifier.
    ProgramId
}

ledger_key_newtype! {
    /// A compressed-state Merkle tree identifier.
    TreeId
}

ledger_key_newtype! {
    /// The output queue paired with a compressed-state tree.
    QueueId
}

ledger_key_newtype! {
    /// The hash of a compressed account's current content. Superseded on
    /// every state update; a stale hash cannot be proven.
    ContentHash
}

/// A deterministic logical address for a compressed account.
///
/// Produced by [`veil-resolver`'s derivation function] as a pure one-way
/// function of `(namespace_tag, participants…, program, tree)`. Identical
/// inputs always yield the identical address; callers are responsible for
/// normalizing participant ordering before deriving (see
/// [`crate::pool::MintPair`]).
///
/// [`veil-resolver`'s derivation function]: https://docs.rs/veil-resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicalAddress(pub AccountId);

impl LogicalAddress {
    /// Construct from raw bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(AccountId::new(bytes))
    }

    /// Access the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl std::fmt::Display for LogicalAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_hex_roundtrip() {
        let id = AccountId::new([7u8; 32]);
        let hex = id.to_string();
        assert_eq!(hex.len(), 64);
        assert_eq!(AccountId::from_hex(&hex).unwrap(), id);
    }

    #[test]
    fn account_id_rejects_wrong_length() {
        let err = AccountId::from_hex("abcd").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidIdentifier { .. }));
    }

    #[test]
    fn account_id_rejects_non_hex() {
        assert!(AccountId::from_hex(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn serde_rejects_invalid_at_wire_boundary() {
        let ok: Result<AccountId, _> = serde_json::from_str(&format!("\"{}\"", "ab".repeat(32)));
        assert!(ok.is_ok());
        let bad: Result<AccountId, _> = serde_json::from_str("\"not-hex\"");
        assert!(bad.is_err());
    }

    #[test]
    fn newtypes_are_distinct() {
        // Compile-time property: MintId and TreeId share wire format but
        // not type identity. Constructing both from the same bytes is the
        // only place they meet.
        let mint = MintId::new([1u8; 32]);
        let tree = TreeId::new([1u8; 32]);
        assert_eq!(mint.as_bytes(), tree.as_bytes());
    }

    #[test]
    fn short_form_is_stable_prefix() {
        let id = AccountId::new([0xab; 32]);
        assert_eq!(id.short(), "ab".repeat(8));
        assert!(id.to_string().starts_with(&id.short()));
    }
}
