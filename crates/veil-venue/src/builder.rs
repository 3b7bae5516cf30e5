//! # Transaction Assembly
//!
//! Packages encoded instructions into one transaction plan per logical
//! operation. Every plan opens with a compute-unit request sized for
//! ciphertext arithmetic, then carries the operation's instructions in
//! submission order.
//!
//! ## Why One Transaction Per Operation
//!
//! A pool-mutating instruction consumes the pool's current content hash;
//! two mutations in flight against the same hash means the second proves
//! against superseded state and fails. Single-operation transactions keep
//! that window as small as the ledger allows.

use serde::{Deserialize, Serialize};
use tracing::debug;

use veil_core::{AccountId, Ciphertext, InstructionDescriptor, MintPair, PoolConfig, MAX_FEE_BPS};
use veil_resolver::ResolvedAccount;

use crate::error::VenueError;
use crate::executor::BlockRef;
use crate::pipeline::{decode_pool, SwapAmounts};
use crate::program::{SwapProgramEncoder, TokenAccounts, COMPUTE_UNIT_LIMIT};

/// A logical swap-program operation with its encrypted arguments.
#[derive(Debug, Clone)]
pub enum SwapOperation {
    /// Create the pool record for a mint pair. The config type enforces
    /// the fee range at construction, so an out-of-range fee can never
    /// reach the encoder.
    InitializePool {
        /// Validated pool configuration.
        config: PoolConfig,
    },
    /// Deposit into both reserve slots.
    AddLiquidity {
        amount_a: Ciphertext,
        amount_b: Ciphertext,
    },
    /// Swap an exact encrypted input.
    SwapExactIn {
        amounts: SwapAmounts,
        /// Direction: `true` trades mint A for mint B.
        a_to_b: bool,
    },
    /// Withdraw from both reserve slots.
    RemoveLiquidity {
        amount_a: Ciphertext,
        amount_b: Ciphertext,
    },
    /// Drain accumulated protocol fees to the authority.
    WithdrawProtocolFees {
        amount_a: Ciphertext,
        amount_b: Ciphertext,
    },
    /// Pause or resume the pool.
    SetPause { paused: bool },
    /// Update the swap fee.
    SetFee { fee_bps: u16 },
    /// Rotate the pool authority.
    SetAuthority { new_authority: AccountId },
}

impl SwapOperation {
    /// Stable operation name for log lines and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitializePool { .. } => "initialize_pool",
            Self::AddLiquidity { .. } => "add_liquidity",
            Self::SwapExactIn { .. } => "swap_exact_in",
            Self::RemoveLiquidity { .. } => "remove_liquidity",
            Self::WithdrawProtocolFees { .. } => "withdraw_protocol_fees",
            Self::SetPause { .. } => "set_pause",
            Self::SetFee { .. } => "set_fee",
            Self::SetAuthority { .. } => "set_authority",
        }
    }

    /// Whether the operation mutates an existing pool record (and so
    /// needs a resolved account with a live inclusion proof).
    pub fn requires_pool(&self) -> bool {
        !matches!(self, Self::InitializePool { .. })
    }
}

/// A transaction ready for simulation or submission on either venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionPlan {
    /// The signing fee payer.
    pub fee_payer: AccountId,
    /// Recent block reference anchoring the transaction's validity window.
    pub block_ref: BlockRef,
    /// Compute-unit limit requested before the first instruction.
    pub compute_unit_limit: u32,
    /// Instructions in submission order.
    pub instructions: Vec<InstructionDescriptor>,
}

/// Assembles [`TransactionPlan`]s for swap-program operations.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    encoder: SwapProgramEncoder,
    fee_payer: AccountId,
    compute_unit_limit: u32,
}

impl TransactionBuilder {
    /// Build for a fee payer with the default compute-unit limit.
    pub fn new(encoder: SwapProgramEncoder, fee_payer: AccountId) -> Self {
        Self {
            encoder,
            fee_payer,
            compute_unit_limit: COMPUTE_UNIT_LIMIT,
        }
    }

    /// Override the compute-unit limit (dry-runs request a higher
    /// ceiling so a limit breach surfaces as a program error, not a
    /// budget error).
    pub fn with_compute_unit_limit(mut self, limit: u32) -> Self {
        self.compute_unit_limit = limit;
        self
    }

    fn plan(&self, block_ref: BlockRef, instructions: Vec<InstructionDescriptor>) -> TransactionPlan {
        TransactionPlan {
            fee_payer: self.fee_payer,
            block_ref,
            compute_unit_limit: self.compute_unit_limit,
            instructions,
        }
    }

    /// Assemble one transaction for a pool operation.
    ///
    /// `pool` must be `Some` with a decodable payload for every operation
    /// except [`SwapOperation::InitializePool`]; `tokens` carries the
    /// balance accounts the operation moves value between and is unused
    /// for initialization, fee withdrawal, and admin updates.
    pub fn plan_operation(
        &self,
        operation: &SwapOperation,
        authority: AccountId,
        pool: Option<&ResolvedAccount>,
        tokens: &TokenAccounts,
        block_ref: BlockRef,
    ) -> Result<TransactionPlan, VenueError> {
        // Pool mutations prove against current pool state, so they need
        // the resolved record with a decodable payload. Liquidity and
        // swap instructions additionally refuse a paused pool up front;
        // admin updates (including unpause) and fee withdrawal go
        // through regardless.
        let pool_for_mutation = |blocked_when_paused: bool| -> Result<&ResolvedAccount, VenueError> {
            let resolved = pool.ok_or_else(|| VenueError::Encoding {
                reason: format!("{} requires a resolved pool account", operation.name()),
            })?;
            let state = decode_pool(&resolved.record.data)?;
            if blocked_when_paused && state.is_paused {
                return Err(VenueError::Encoding {
                    reason: format!("pool is paused; {} is not permitted", operation.name()),
                });
            }
            Ok(resolved)
        };

        let instruction = match operation {
            SwapOperation::InitializePool { config } => {
                self.encoder
                    .initialize_pool(config.authority, &config.mints, config.fee_bps)
            }
            SwapOperation::AddLiquidity { amount_a, amount_b } => self.encoder.add_liquidity(
                authority,
                pool_for_mutation(true)?,
                tokens,
                amount_a,
                amount_b,
            ),
            SwapOperation::SwapExactIn { amounts, a_to_b } => self.encoder.swap_exact_in(
                authority,
                pool_for_mutation(true)?,
                tokens,
                amounts,
                *a_to_b,
            ),
            SwapOperation::RemoveLiquidity { amount_a, amount_b } => self.encoder.remove_liquidity(
                authority,
                pool_for_mutation(true)?,
                tokens,
                amount_a,
                amount_b,
            ),
            SwapOperation::WithdrawProtocolFees { amount_a, amount_b } => {
                self.encoder.withdraw_protocol_fees(
                    authority,
                    pool_for_mutation(false)?,
                    amount_a,
                    amount_b,
                )
            }
            SwapOperation::SetPause { paused } => {
                self.encoder
                    .set_pause(authority, pool_for_mutation(false)?, *paused)
            }
            SwapOperation::SetFee { fee_bps } => {
                if *fee_bps > MAX_FEE_BPS {
                    return Err(VenueError::Encoding {
                        reason: format!(
                            "fee {fee_bps} bps exceeds the maximum of {MAX_FEE_BPS}"
                        ),
                    });
                }
                self.encoder
                    .set_fee(authority, pool_for_mutation(false)?, *fee_bps)
            }
            SwapOperation::SetAuthority { new_authority } => {
                self.encoder
                    .set_authority(authority, pool_for_mutation(false)?, *new_authority)
            }
        };

        debug!(
            operation = operation.name(),
            authority = %authority.short(),
            compute_unit_limit = self.compute_unit_limit,
            "assembled transaction plan"
        );
        Ok(self.plan(block_ref, vec![instruction]))
    }

    /// Assemble the token-setup transaction for one wallet: idempotent
    /// balance-account creation for both mints of a pair.
    pub fn plan_token_accounts(
        &self,
        payer: AccountId,
        wallet: AccountId,
        mints: &MintPair,
        accounts: (AccountId, AccountId),
        block_ref: BlockRef,
    ) -> TransactionPlan {
        let instructions = vec![
            self.encoder
                .create_token_account_idempotent(payer, accounts.0, mints.mint_a(), wallet),
            self.encoder
                .create_token_account_idempotent(payer, accounts.1, mints.mint_b(), wallet),
        ];
        self.plan(block_ref, instructions)
    }

    /// Assemble a mint-initialization transaction.
    pub fn plan_initialize_mint(
        &self,
        payer: AccountId,
        mint: veil_core::MintId,
        decimals: u8,
        mint_authority: AccountId,
        block_ref: BlockRef,
    ) -> TransactionPlan {
        let instruction = self
            .encoder
            .initialize_mint(payer, mint, decimals, mint_authority);
        self.plan(block_ref, vec![instruction])
    }

    /// Assemble a mint-to transaction for an encrypted amount.
    pub fn plan_mint_to(
        &self,
        mint_authority: AccountId,
        mint: veil_core::MintId,
        account: AccountId,
        amount: &Ciphertext,
        block_ref: BlockRef,
    ) -> TransactionPlan {
        let instruction = self.encoder.mint_to(mint_authority, mint, account, amount);
        self.plan(block_ref, vec![instruction])
    }

    /// Package a permission setup plan into one atomic transaction, so
    /// creation and delegation land together or not at all.
    pub fn plan_permission_setup(
        &self,
        setup: veil_permission::SetupPlan,
        block_ref: BlockRef,
    ) -> TransactionPlan {
        self.plan(block_ref, setup.instructions)
    }
}
