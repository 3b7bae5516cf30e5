//! # veil-verify — Stack Compatibility Verification
//!
//! Answers one operational question before any value moves: which parts
//! of the confidential swap stack are actually usable on this ledger,
//! and on which venue may the swap run?
//!
//! Three layers are probed with fixed, ordered checklists — compressed
//! pool state, the encryption service, and the delegated execution
//! venue. Every check runs and every outcome is recorded; the aggregated
//! [`CompatibilityReport`] downgrades to the base venue unless the
//! end-to-end swap dry-run passed on the delegated one.

pub mod harness;
pub mod report;

pub use harness::{
    CompressionProbe, DelegatedProbePlans, DelegationProbe, EncryptionProbe, VerificationHarness,
};
pub use report::{CheckLayer, CheckResult, CheckStatus, CompatibilityReport};
