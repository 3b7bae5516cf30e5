//! # Opaque Ciphertext Amounts
//!
//! Encrypted unsigned-integer amounts as they cross the system boundary.
//! The veil core never inspects or combines ciphertext bytes — arithmetic
//! on encrypted values is performed by the on-ledger encryption program,
//! which holds the corresponding decryption capability.
//!
//! ## Why No `PartialEq`
//!
//! The encryption scheme is non-deterministic: encrypting the same
//! plaintext twice yields different bytes. Any business-logic equality
//! comparison between ciphertexts is therefore a bug, and this type makes
//! it a compile error instead of a silent false. Tests that need to
//! compare raw bytes go through [`Ciphertext::as_bytes`] explicitly.

use serde::{Deserialize, Serialize};

/// An opaque encrypted amount.
///
/// Produced by an encryption service; consumed byte-for-byte by
/// instruction builders. Only shape observations (`len`, `is_empty`) are
/// available — there is no plaintext recovery at this layer.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ciphertext(Vec<u8>);

impl Ciphertext {
    /// Wrap raw ciphertext bytes from an encryption service.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Byte length of the ciphertext. A zero-length payload for an
    /// account known to exist signals an encoding or resolution failure,
    /// never a plaintext zero — encrypted zero still has ciphertext bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload is empty. See [`Ciphertext::len`].
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Access the raw bytes for packaging into instruction data.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the raw byte vector.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl std::fmt::Debug for Ciphertext {
    /// Redacted: log lines show only the length, never ciphertext bytes.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ciphertext({} bytes)", self.0.len())
    }
}
