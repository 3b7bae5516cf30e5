//! # veil-permission — Delegation Lifecycle Management
//!
//! Governs which principals may observe or execute on an account, and
//! whether the account has been delegated to the off-base execution
//! venue. Three pieces:
//!
//! - [`state`]: the lifecycle state machine
//!   (`Uninitialized → Created → DelegationRequested → Active`, with
//!   `TimedOut` and `Failed` terminals) with legality-checked transitions
//!   and an audit trail of transition records.
//! - [`setup`]: assembly of the permission-creation, permission-delegation,
//!   and account-delegation instructions into one atomic transaction plan,
//!   so no external observer can ever see "permission exists, delegation
//!   not yet requested" as a durable state.
//! - [`poll`]: deadline-bounded polling of the delegated venue's status
//!   endpoint, the only retry loop in the veil core.

pub mod poll;
pub mod setup;
pub mod state;

pub use poll::{
    all_active, reconfirm_active, wait_until_active, Activation, DelegationStatusSource,
    PermissionStatus, PollConfig,
};
pub use setup::{DelegationInstructionBuilder, PermissionSetup, SetupPlan};
pub use state::{LifecycleError, PermissionLifecycle, PermissionRecord, PermissionState, TransitionRecord};
