//! # Swap-Program Instruction Encoding
//!
//! The concrete binding to the confidential swap program's instruction
//! surface: resolves the account list and serializes the argument layout
//! for each instruction, producing [`InstructionDescriptor`]s for
//! transaction assembly. Builders here are pure — no I/O.
//!
//! ## Wire Layout
//!
//! `data = discriminator (1 byte) ++ fields`, integers little-endian,
//! ciphertexts length-prefixed with a `u32`. The layout is fixed by the
//! on-ledger program; changing it here without a program upgrade bricks
//! every instruction.

use sha2::{Digest, Sha256};

use veil_core::{
    AccountId, AccountMeta, Ciphertext, InstructionDescriptor, Member, MintId, MintPair, ProgramId,
};
use veil_permission::DelegationInstructionBuilder;
use veil_resolver::ResolvedAccount;

use crate::pipeline::SwapAmounts;

/// Compute-unit limit requested ahead of encrypted-arithmetic
/// instructions. Ciphertext operations are an order of magnitude heavier
/// than plaintext ones.
pub const COMPUTE_UNIT_LIMIT: u32 = 400_000;

// Instruction discriminators, fixed by the program's dispatch table.
const IX_INITIALIZE_POOL: u8 = 0;
const IX_ADD_LIQUIDITY: u8 = 1;
const IX_SWAP_EXACT_IN: u8 = 2;
const IX_REMOVE_LIQUIDITY: u8 = 3;
const IX_WITHDRAW_PROTOCOL_FEES: u8 = 4;
const IX_SET_PAUSE: u8 = 5;
const IX_SET_FEE: u8 = 6;
const IX_SET_AUTHORITY: u8 = 7;
const IX_CREATE_PERMISSION: u8 = 8;
const IX_DELEGATE_PERMISSION: u8 = 9;
const IX_DELEGATE_ACCOUNT: u8 = 10;
const IX_INITIALIZE_MINT: u8 = 11;
const IX_CREATE_TOKEN_ACCOUNT: u8 = 12;
const IX_MINT_TO: u8 = 13;

/// Derive the permission account paired with a permissioned account.
pub fn permission_account_for(account: AccountId) -> AccountId {
    let mut hasher = Sha256::new();
    hasher.update(b"veil:permission");
    hasher.update(account.as_bytes());
    AccountId::new(hasher.finalize().into())
}

/// The token balance accounts touched by a pool operation.
#[derive(Debug, Clone, Copy)]
pub struct TokenAccounts {
    /// The user's balance account for mint A.
    pub user_a: AccountId,
    /// The user's balance account for mint B.
    pub user_b: AccountId,
    /// The pool's balance account for mint A.
    pub pool_a: AccountId,
    /// The pool's balance account for mint B.
    pub pool_b: AccountId,
}

impl TokenAccounts {
    fn all(&self) -> [AccountId; 4] {
        [self.user_a, self.user_b, self.pool_a, self.pool_b]
    }
}

/// Pure instruction encoder for the confidential swap program and its
/// token companion.
#[derive(Debug, Clone)]
pub struct SwapProgramEncoder {
    /// The swap program.
    pub program: ProgramId,
    /// The confidential token program.
    pub token_program: ProgramId,
    /// The encryption program performing ciphertext arithmetic.
    pub encryption_program: ProgramId,
    /// The delegation/permission program.
    pub permission_program: ProgramId,
}

impl SwapProgramEncoder {
    fn data(discriminator: u8) -> Vec<u8> {
        vec![discriminator]
    }

    fn push_ciphertext(data: &mut Vec<u8>, ciphertext: &Ciphertext) {
        data.extend_from_slice(&(ciphertext.len() as u32).to_le_bytes());
        data.extend_from_slice(ciphertext.as_bytes());
    }

    fn push_bytes(data: &mut Vec<u8>, bytes: &[u8]) {
        data.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        data.extend_from_slice(bytes);
    }

    /// Encode the proof and tree location of a resolved compressed
    /// account: root index, leaf index, sibling count, address, payload.
    fn push_resolved(data: &mut Vec<u8>, resolved: &ResolvedAccount) {
        data.extend_from_slice(&resolved.proof.root_index.to_le_bytes());
        data.extend_from_slice(&resolved.record.leaf_index.to_le_bytes());
        data.extend_from_slice(&(resolved.proof.siblings.len() as u32).to_le_bytes());
        for sibling in &resolved.proof.siblings {
            data.extend_from_slice(sibling.as_bytes());
        }
        data.extend_from_slice(resolved.record.address.as_bytes());
        Self::push_bytes(data, &resolved.record.data);
    }

    /// Tree and queue metas for a compressed-state mutation.
    fn tree_metas(resolved: &ResolvedAccount) -> [AccountMeta; 2] {
        [
            AccountMeta::writable(resolved.record.tree_info.tree.0),
            AccountMeta::writable(resolved.record.tree_info.queue.0),
        ]
    }

    /// Pool initialization for a normalized mint pair.
    pub fn initialize_pool(
        &self,
        authority: AccountId,
        mints: &MintPair,
        fee_bps: u16,
    ) -> InstructionDescriptor {
        let mut data = Self::data(IX_INITIALIZE_POOL);
        data.extend_from_slice(&fee_bps.to_le_bytes());
        InstructionDescriptor {
            program: self.program,
            accounts: vec![
                AccountMeta::signer(authority),
                AccountMeta::readonly(mints.mint_a().0),
                AccountMeta::readonly(mints.mint_b().0),
                AccountMeta::readonly(self.encryption_program.0),
            ],
            data,
        }
    }

    fn liquidity_like(
        &self,
        discriminator: u8,
        authority: AccountId,
        pool: &ResolvedAccount,
        tokens: &TokenAccounts,
        amount_a: &Ciphertext,
        amount_b: &Ciphertext,
    ) -> InstructionDescriptor {
        let mut data = Self::data(discriminator);
        Self::push_resolved(&mut data, pool);
        Self::push_ciphertext(&mut data, amount_a);
        Self::push_ciphertext(&mut data, amount_b);

        let mut accounts = vec![AccountMeta::signer(authority)];
        accounts.extend(tokens.all().map(AccountMeta::writable));
        accounts.extend(Self::tree_metas(pool));
        accounts.push(AccountMeta::readonly(self.encryption_program.0));
        accounts.push(AccountMeta::readonly(self.token_program.0));
        InstructionDescriptor {
            program: self.program,
            accounts,
            data,
        }
    }

    /// Deposit encrypted amounts of both mints into the pool.
    pub fn add_liquidity(
        &self,
        authority: AccountId,
        pool: &ResolvedAccount,
        tokens: &TokenAccounts,
        amount_a: &Ciphertext,
        amount_b: &Ciphertext,
    ) -> InstructionDescriptor {
        self.liquidity_like(IX_ADD_LIQUIDITY, authority, pool, tokens, amount_a, amount_b)
    }

    /// Withdraw encrypted amounts of both mints from the pool.
    pub fn remove_liquidity(
        &self,
        authority: AccountId,
        pool: &ResolvedAccount,
        tokens: &TokenAccounts,
        amount_a: &Ciphertext,
        amount_b: &Ciphertext,
    ) -> InstructionDescriptor {
        self.liquidity_like(
            IX_REMOVE_LIQUIDITY,
            authority,
            pool,
            tokens,
            amount_a,
            amount_b,
        )
    }

    /// Swap an exact encrypted input for an encrypted output.
    /// `amounts.amount_in` must already be net of fees.
    pub fn swap_exact_in(
        &self,
        authority: AccountId,
        pool: &ResolvedAccount,
        tokens: &TokenAccounts,
        amounts: &SwapAmounts,
        a_to_b: bool,
    ) -> InstructionDescriptor {
        let mut data = Self::data(IX_SWAP_EXACT_IN);
        Self::push_resolved(&mut data, pool);
        Self::push_ciphertext(&mut data, &amounts.amount_in);
        Self::push_ciphertext(&mut data, &amounts.amount_out);
        Self::push_ciphertext(&mut data, &amounts.fee);
        data.push(a_to_b as u8);

        let mut accounts = vec![AccountMeta::signer(authority)];
        accounts.extend(tokens.all().map(AccountMeta::writable));
        accounts.extend(Self::tree_metas(pool));
        accounts.push(AccountMeta::readonly(self.encryption_program.0));
        accounts.push(AccountMeta::readonly(self.token_program.0));
        InstructionDescriptor {
            program: self.program,
            accounts,
            data,
        }
    }

    /// Withdraw accumulated encrypted protocol fees to the authority.
    pub fn withdraw_protocol_fees(
        &self,
        authority: AccountId,
        pool: &ResolvedAccount,
        amount_a: &Ciphertext,
        amount_b: &Ciphertext,
    ) -> InstructionDescriptor {
        let mut data = Self::data(IX_WITHDRAW_PROTOCOL_FEES);
        Self::push_resolved(&mut data, pool);
        Self::push_ciphertext(&mut data, amount_a);
        Self::push_ciphertext(&mut data, amount_b);
        let mut accounts = vec![AccountMeta::signer(authority)];
        accounts.extend(Self::tree_metas(pool));
        accounts.push(AccountMeta::readonly(self.encryption_program.0));
        InstructionDescriptor {
            program: self.program,
            accounts,
            data,
        }
    }

    fn admin_update(
        &self,
        discriminator: u8,
        authority: AccountId,
        pool: &ResolvedAccount,
        payload: &[u8],
    ) -> InstructionDescriptor {
        let mut data = Self::data(discriminator);
        Self::push_resolved(&mut data, pool);
        data.extend_from_slice(payload);
        let mut accounts = vec![AccountMeta::signer(authority)];
        accounts.extend(Self::tree_metas(pool));
        InstructionDescriptor {
            program: self.program,
            accounts,
            data,
        }
    }

    /// Pause or unpause the pool.
    pub fn set_pause(
        &self,
        authority: AccountId,
        pool: &ResolvedAccount,
        paused: bool,
    ) -> InstructionDescriptor {
        self.admin_update(IX_SET_PAUSE, authority, pool, &[paused as u8])
    }

    /// Update the pool fee.
    pub fn set_fee(
        &self,
        authority: AccountId,
        pool: &ResolvedAccount,
        fee_bps: u16,
    ) -> InstructionDescriptor {
        self.admin_update(IX_SET_FEE, authority, pool, &fee_bps.to_le_bytes())
    }

    /// Rotate the pool authority.
    pub fn set_authority(
        &self,
        authority: AccountId,
        pool: &ResolvedAccount,
        new_authority: AccountId,
    ) -> InstructionDescriptor {
        self.admin_update(IX_SET_AUTHORITY, authority, pool, new_authority.as_bytes())
    }

    /// Initialize a confidential token mint.
    pub fn initialize_mint(
        &self,
        payer: AccountId,
        mint: MintId,
        decimals: u8,
        mint_authority: AccountId,
    ) -> InstructionDescriptor {
        let mut data = Self::data(IX_INITIALIZE_MINT);
        data.push(decimals);
        data.extend_from_slice(mint_authority.as_bytes());
        InstructionDescriptor {
            program: self.token_program,
            accounts: vec![
                AccountMeta::signer(payer),
                AccountMeta::writable(mint.0),
                AccountMeta::readonly(self.encryption_program.0),
            ],
            data,
        }
    }

    /// Idempotently create a token balance account for `wallet` and
    /// `mint`. Safe to include even when the account already exists.
    pub fn create_token_account_idempotent(
        &self,
        payer: AccountId,
        account: AccountId,
        mint: MintId,
        wallet: AccountId,
    ) -> InstructionDescriptor {
        let mut data = Self::data(IX_CREATE_TOKEN_ACCOUNT);
        data.extend_from_slice(wallet.as_bytes());
        InstructionDescriptor {
            program: self.token_program,
            accounts: vec![
                AccountMeta::signer(payer),
                AccountMeta::writable(account),
                AccountMeta::readonly(mint.0),
                AccountMeta::readonly(self.encryption_program.0),
            ],
            data,
        }
    }

    /// Mint an encrypted amount into a token balance account.
    pub fn mint_to(
        &self,
        mint_authority: AccountId,
        mint: MintId,
        account: AccountId,
        amount: &Ciphertext,
    ) -> InstructionDescriptor {
        let mut data = Self::data(IX_MINT_TO);
        Self::push_ciphertext(&mut data, amount);
        InstructionDescriptor {
            program: self.token_program,
            accounts: vec![
                AccountMeta::signer(mint_authority),
                AccountMeta::readonly(mint.0),
                AccountMeta::writable(account),
                AccountMeta::readonly(self.encryption_program.0),
            ],
            data,
        }
    }
}

impl DelegationInstructionBuilder for SwapProgramEncoder {
    fn create_permission(&self, account: AccountId, members: &[Member]) -> InstructionDescriptor {
        let mut data = Self::data(IX_CREATE_PERMISSION);
        data.extend_from_slice(&(members.len() as u32).to_le_bytes());
        for member in members {
            data.extend_from_slice(member.principal.as_bytes());
            data.extend_from_slice(&member.flags.bits().to_le_bytes());
        }
        InstructionDescriptor {
            program: self.program,
            accounts: vec![
                AccountMeta::readonly(account),
                AccountMeta::writable(permission_account_for(account)),
                AccountMeta::readonly(self.permission_program.0),
            ],
            data,
        }
    }

    fn delegate_permission(
        &self,
        account: AccountId,
        validator: AccountId,
    ) -> InstructionDescriptor {
        let mut data = Self::data(IX_DELEGATE_PERMISSION);
        data.extend_from_slice(validator.as_bytes());
        InstructionDescriptor {
            program: self.permission_program,
            accounts: vec![
                AccountMeta::readonly(account),
                AccountMeta::writable(permission_account_for(account)),
                AccountMeta::readonly(validator),
            ],
            data,
        }
    }

    fn delegate_account(&self, account: AccountId, validator: AccountId) -> InstructionDescriptor {
        let mut data = Self::data(IX_DELEGATE_ACCOUNT);
        data.extend_from_slice(validator.as_bytes());
        InstructionDescriptor {
            program: self.program,
            accounts: vec![
                AccountMeta::writable(account),
                AccountMeta::readonly(validator),
            ],
            data,
        }
    }
}
