//! # veil-venue — Venue Selection & Transaction Building
//!
//! Assembles one transaction per logical swap operation from a resolved
//! compressed account, ciphertext amounts, and the permission state of
//! every involved account — then chooses where it may run.
//!
//! ## Venue Gating
//!
//! The delegated venue is targeted only when *every* participating
//! account's permission is `Active`; anything less falls back to the base
//! ledger. Partial activation is valid but unusable.
//!
//! ## Incompatibility vs. Rejection
//!
//! A dry-run failure whose error payload matches the venue's
//! foreign-program-access signature is a *venue incompatibility* — the
//! venue cannot execute logic depending on programs outside its isolated
//! environment. That is a property of the venue, not of the transaction,
//! and is classified separately from genuine business rejections so the
//! verification harness can tell "composition infeasible" apart from
//! "this transaction was invalid".

pub mod auth;
pub mod builder;
pub mod classify;
pub mod error;
pub mod executor;
pub mod pipeline;
pub mod program;
pub mod selector;

pub use auth::{AuthToken, VenueAuthenticator};
pub use builder::{SwapOperation, TransactionBuilder, TransactionPlan};
pub use classify::{classify_simulation, IncompatibilitySignatures, SimulationVerdict};
pub use error::VenueError;
pub use executor::{AccountInfo, BlockRef, LedgerQuery, SimulationOutcome, TxSignature, VenueExecutor};
pub use pipeline::{decode_pool, encode_pool, AmountPipeline, EncryptionService, SwapAmounts};
pub use program::{permission_account_for, SwapProgramEncoder, TokenAccounts, COMPUTE_UNIT_LIMIT};
pub use selector::{select_venue, Venue};
