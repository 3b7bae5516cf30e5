//! # Permission Lifecycle State Machine
//!
//! Every account that participates in a delegated operation carries a
//! permission record, and that record moves through a fixed lifecycle:
//!
//! ```text
//! Uninitialized ──► Created ──► DelegationRequested ──► Active
//!        │              │                │                 │
//!        │              │                ├──► TimedOut     └─(redelegate)─► DelegationRequested
//!        └──────────────┴────────────────┴──► Failed
//! ```
//!
//! `Failed` is reachable from any non-terminal state when the creating or
//! delegating transaction is rejected by the base ledger — distinct from
//! `TimedOut`, which means the transaction landed but the venue never
//! reported the account active within the caller's deadline.
//!
//! ## Monotonicity
//!
//! Once `Active` is observed, the machine never re-enters `Created` or
//! `DelegationRequested` except through the explicit
//! [`PermissionLifecycle::redelegate`] transition. Invalid transitions
//! are rejected with structured errors, never silently absorbed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use veil_core::{AccountId, Member};

/// Lifecycle state of an account's permission record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionState {
    /// No permission record exists yet.
    Uninitialized,
    /// The creation transaction landed; delegation is part of the same
    /// atomic transaction, so this state is only observable locally
    /// between building and confirming the plan.
    Created,
    /// The atomic create+delegate transaction confirmed on the base
    /// ledger; awaiting the venue's activation report.
    DelegationRequested,
    /// The delegated venue reports the account as active.
    Active,
    /// Activation polling exceeded the caller's deadline. Terminal.
    TimedOut,
    /// The create/delegate transaction was rejected by the base ledger.
    /// Terminal.
    Failed,
}

impl PermissionState {
    /// Whether this is a terminal state (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::TimedOut | Self::Failed)
    }

    /// The canonical string name of this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "UNINITIALIZED",
            Self::Created => "CREATED",
            Self::DelegationRequested => "DELEGATION_REQUESTED",
            Self::Active => "ACTIVE",
            Self::TimedOut => "TIMED_OUT",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for PermissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors from lifecycle transitions.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// The attempted transition is not an edge of the state machine.
    #[error("invalid permission transition for {account}: {from} -> {to}")]
    InvalidTransition {
        /// The permissioned account.
        account: AccountId,
        /// Current state.
        from: PermissionState,
        /// Attempted target state.
        to: PermissionState,
    },

    /// The lifecycle is already in a terminal state.
    #[error("permission for {account} is terminal at {state}")]
    AlreadyTerminal {
        /// The permissioned account.
        account: AccountId,
        /// The terminal state.
        state: PermissionState,
    },
}

/// One recorded transition, for diagnostics and audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// State before the transition.
    pub from: PermissionState,
    /// State after the transition.
    pub to: PermissionState,
    /// When the transition was recorded.
    pub at: DateTime<Utc>,
    /// Context: transaction signature, venue response, rejection reason.
    pub detail: Option<String>,
}

/// The authorization object naming which principals may observe or act
/// on an account, and its lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionRecord {
    /// The account the permissions apply to.
    pub permissioned_account: AccountId,
    /// Principals and their capability flags.
    pub members: Vec<Member>,
    /// Current lifecycle state.
    pub state: PermissionState,
}

/// A permission record together with its transition history, enforcing
/// the lifecycle edges at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionLifecycle {
    record: PermissionRecord,
    history: Vec<TransitionRecord>,
}

impl PermissionLifecycle {
    /// Start a lifecycle for an account with its intended member list.
    pub fn new(permissioned_account: AccountId, members: Vec<Member>) -> Self {
        Self {
            record: PermissionRecord {
                permissioned_account,
                members,
                state: PermissionState::Uninitialized,
            },
            history: Vec::new(),
        }
    }

    /// The permissioned account.
    pub fn account(&self) -> AccountId {
        self.record.permissioned_account
    }

    /// Current state.
    pub fn state(&self) -> PermissionState {
        self.record.state
    }

    /// The underlying record.
    pub fn record(&self) -> &PermissionRecord {
        &self.record
    }

    /// The recorded transition history, oldest first.
    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    fn transition(
        &mut self,
        to: PermissionState,
        allowed_from: &[PermissionState],
        detail: Option<String>,
    ) -> Result<(), LifecycleError> {
        let from = self.record.state;
        if from.is_terminal() {
            return Err(LifecycleError::AlreadyTerminal {
                account: self.record.permissioned_account,
                state: from,
            });
        }
        if !allowed_from.contains(&from) {
            return Err(LifecycleError::InvalidTransition {
                account: self.record.permissioned_account,
                from,
                to,
            });
        }
        tracing::debug!(
            account = %self.record.permissioned_account.short(),
            %from,
            %to,
            "permission transition"
        );
        self.record.state = to;
        self.history.push(TransitionRecord {
            from,
            to,
            at: Utc::now(),
            detail,
        });
        Ok(())
    }

    /// The permission-creation instruction was included in a submitted
    /// transaction.
    pub fn mark_created(&mut self, detail: Option<String>) -> Result<(), LifecycleError> {
        self.transition(
            PermissionState::Created,
            &[PermissionState::Uninitialized],
            detail,
        )
    }

    /// The atomic create+delegate transaction confirmed on the base
    /// ledger.
    pub fn mark_delegation_requested(
        &mut self,
        detail: Option<String>,
    ) -> Result<(), LifecycleError> {
        self.transition(
            PermissionState::DelegationRequested,
            &[PermissionState::Created],
            detail,
        )
    }

    /// The delegated venue reported the account active.
    pub fn mark_active(&mut self, detail: Option<String>) -> Result<(), LifecycleError> {
        self.transition(
            PermissionState::Active,
            &[PermissionState::DelegationRequested],
            detail,
        )
    }

    /// Activation polling exceeded its deadline. Terminal; the caller may
    /// start a fresh lifecycle to retry with a longer deadline.
    pub fn mark_timed_out(&mut self, detail: Option<String>) -> Result<(), LifecycleError> {
        self.transition(
            PermissionState::TimedOut,
            &[PermissionState::DelegationRequested],
            detail,
        )
    }

    /// The base ledger rejected the creating/delegating transaction.
    /// Valid from any non-terminal state.
    pub fn mark_failed(&mut self, detail: Option<String>) -> Result<(), LifecycleError> {
        self.transition(
            PermissionState::Failed,
            &[
                PermissionState::Uninitialized,
                PermissionState::Created,
                PermissionState::DelegationRequested,
                PermissionState::Active,
            ],
            detail,
        )
    }

    /// Explicit re-delegation: the only path out of `Active` back into
    /// the delegation flow.
    pub fn redelegate(&mut self, detail: Option<String>) -> Result<(), LifecycleError> {
        self.transition(
            PermissionState::DelegationRequested,
            &[PermissionState::Active],
            detail,
        )
    }
}
