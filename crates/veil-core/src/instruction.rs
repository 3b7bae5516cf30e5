//! Signed-instruction descriptors.
//!
//! The wire-level shape of a single program instruction: the target
//! program, the ordered account metas, and the opaque instruction data.
//! Program-specific builders (the swap program surface in `veil-venue`)
//! produce these; transaction assembly packages them.

use serde::{Deserialize, Serialize};

use crate::id::{AccountId, ProgramId};

/// One account referenced by an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMeta {
    /// The account's ledger key.
    pub key: AccountId,
    /// Whether the account must sign the transaction.
    pub is_signer: bool,
    /// Whether the instruction may mutate the account.
    pub is_writable: bool,
}

impl AccountMeta {
    /// A writable non-signer account.
    pub fn writable(key: AccountId) -> Self {
        Self {
            key,
            is_signer: false,
            is_writable: true,
        }
    }

    /// A read-only non-signer account.
    pub fn readonly(key: AccountId) -> Self {
        Self {
            key,
            is_signer: false,
            is_writable: false,
        }
    }

    /// A writable signer account.
    pub fn signer(key: AccountId) -> Self {
        Self {
            key,
            is_signer: true,
            is_writable: true,
        }
    }
}

/// A fully-resolved instruction ready for transaction packaging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionDescriptor {
    /// The program that executes this instruction.
    pub program: ProgramId,
    /// Ordered account metas.
    pub accounts: Vec<AccountMeta>,
    /// Opaque instruction data (discriminator + serialized arguments).
    pub data: Vec<u8>,
}
