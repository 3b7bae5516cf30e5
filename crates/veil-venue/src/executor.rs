//! Ledger-query and venue-execution capabilities.
//!
//! The veil core depends only on these traits; `veil-client` provides
//! the HTTP implementations (one per venue) and tests provide fakes.

use serde::{Deserialize, Serialize};

use veil_core::AccountId;

use crate::builder::TransactionPlan;
use crate::error::VenueError;

/// Base-ledger view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Whether the account exists on the base ledger.
    pub exists: bool,
    /// Whether the account is an executable program.
    pub executable: bool,
    /// The owning program, if the account exists.
    pub owner: Option<AccountId>,
}

/// A recent-block reference anchoring a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRef(pub String);

/// Read-only base-ledger queries.
pub trait LedgerQuery: Send + Sync {
    /// Look up an account on the base ledger.
    fn account_info(
        &self,
        account: AccountId,
    ) -> impl std::future::Future<Output = Result<AccountInfo, VenueError>> + Send;

    /// The latest block reference for transaction anchoring.
    fn latest_block_reference(
        &self,
    ) -> impl std::future::Future<Output = Result<BlockRef, VenueError>> + Send;
}

/// Result of a dry-run execution.
///
/// `err == None` means the venue would accept the transaction. A present
/// error comes with whatever execution log the venue produced — the log
/// is the only way to distinguish the true cause when the error string is
/// generic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// The venue's error payload, if simulation failed.
    pub err: Option<String>,
    /// Execution log lines, possibly empty.
    pub logs: Vec<String>,
}

impl SimulationOutcome {
    /// A clean pass.
    pub fn ok() -> Self {
        Self {
            err: None,
            logs: Vec::new(),
        }
    }

    /// A failure with an error payload and logs.
    pub fn failed(err: impl Into<String>, logs: Vec<String>) -> Self {
        Self {
            err: Some(err.into()),
            logs,
        }
    }
}

/// Confirmed-transaction signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxSignature(pub String);

/// A venue that can dry-run and submit transactions.
///
/// Implemented once per concrete venue (base-ledger RPC, delegated-venue
/// RPC). Submission failures must surface the ledger's execution log via
/// [`VenueError::SubmissionRejected`] — a bare error string is not
/// diagnosable.
pub trait VenueExecutor: Send + Sync {
    /// Dry-run the transaction against this venue.
    fn simulate(
        &self,
        plan: &TransactionPlan,
    ) -> impl std::future::Future<Output = Result<SimulationOutcome, VenueError>> + Send;

    /// Submit the transaction and wait for confirmation.
    fn submit(
        &self,
        plan: &TransactionPlan,
    ) -> impl std::future::Future<Output = Result<TxSignature, VenueError>> + Send;
}
