//! # Atomic Permission Setup
//!
//! A permission record without a delegation request (or the reverse) is a
//! coordination hazard: another client observing the half-configured
//! account cannot tell whether delegation is coming. Setup therefore
//! packages three instructions into one all-or-nothing transaction plan:
//!
//! 1. create the permission record naming the member list;
//! 2. delegate the permission record to the venue's validator;
//! 3. the program's own delegate instruction for the account itself.
//!
//! Either all three land or none do — "permission exists, not yet
//! delegation-requested" is never a durable on-ledger state.

use veil_core::{AccountId, InstructionDescriptor, Member};

use crate::state::PermissionLifecycle;

/// The program instruction surface needed for permission setup.
///
/// Implemented by the swap-program binding in `veil-venue` and by test
/// fakes. Builders are pure: they resolve accounts and serialize
/// arguments but perform no I/O.
pub trait DelegationInstructionBuilder {
    /// Instruction creating the permission record for `account` with the
    /// given member list.
    fn create_permission(&self, account: AccountId, members: &[Member]) -> InstructionDescriptor;

    /// Instruction delegating the permission record itself to the venue
    /// validator.
    fn delegate_permission(&self, account: AccountId, validator: AccountId)
        -> InstructionDescriptor;

    /// The owning program's instruction delegating the account to the
    /// venue validator.
    fn delegate_account(&self, account: AccountId, validator: AccountId) -> InstructionDescriptor;
}

/// The assembled atomic plan for one account, plus its lifecycle handle.
#[derive(Debug)]
pub struct SetupPlan {
    /// The three instructions, in submission order, for ONE transaction.
    pub instructions: Vec<InstructionDescriptor>,
    /// The lifecycle to advance based on the submission outcome.
    pub lifecycle: PermissionLifecycle,
}

/// Assembles atomic create+delegate plans.
#[derive(Debug, Clone)]
pub struct PermissionSetup<B> {
    builder: B,
    validator: AccountId,
}

impl<B: DelegationInstructionBuilder> PermissionSetup<B> {
    /// Create a setup assembler targeting one venue validator.
    pub fn new(builder: B, validator: AccountId) -> Self {
        Self { builder, validator }
    }

    /// Build the atomic plan for one account.
    ///
    /// The returned lifecycle is already advanced to `Created`: the
    /// creation instruction exists and is inseparable from the delegation
    /// request. Callers advance it further on confirmation
    /// (`mark_delegation_requested`) or rejection (`mark_failed`).
    pub fn plan_for(&self, account: AccountId, members: Vec<Member>) -> SetupPlan {
        let instructions = vec![
            self.builder.create_permission(account, &members),
            self.builder.delegate_permission(account, self.validator),
            self.builder.delegate_account(account, self.validator),
        ];
        let mut lifecycle = PermissionLifecycle::new(account, members);
        lifecycle
            .mark_created(Some("atomic create+delegate plan assembled".into()))
            .expect("fresh lifecycle accepts Created");
        tracing::debug!(
            account = %account.short(),
            validator = %self.validator.short(),
            "assembled atomic permission plan"
        );
        SetupPlan {
            instructions,
            lifecycle,
        }
    }

    /// Build plans for every participating account of an atomic swap
    /// operation: the pool account and each token balance account it
    /// touches. Each account gets its own plan (and transaction); each
    /// must independently reach `Active` before the delegated venue may
    /// be targeted.
    pub fn plan_for_participants(
        &self,
        participants: &[(AccountId, Vec<Member>)],
    ) -> Vec<SetupPlan> {
        participants
            .iter()
            .map(|(account, members)| self.plan_for(*account, members.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_core::{AccountMeta, ProgramId};

    use crate::state::PermissionState;

    struct FakeBuilder;

    impl FakeBuilder {
        fn descriptor(tag: u8, account: AccountId) -> InstructionDescriptor {
            InstructionDescriptor {
                program: ProgramId::new([0x77; 32]),
                accounts: vec![AccountMeta::writable(account)],
                data: vec![tag],
            }
        }
    }

    impl DelegationInstructionBuilder for FakeBuilder {
        fn create_permission(
            &self,
            account: AccountId,
            _members: &[Member],
        ) -> InstructionDescriptor {
            Self::descriptor(1, account)
        }

        fn delegate_permission(
            &self,
            account: AccountId,
            _validator: AccountId,
        ) -> InstructionDescriptor {
            Self::descriptor(2, account)
        }

        fn delegate_account(
            &self,
            account: AccountId,
            _validator: AccountId,
        ) -> InstructionDescriptor {
            Self::descriptor(3, account)
        }
    }

    fn setup() -> PermissionSetup<FakeBuilder> {
        PermissionSetup::new(FakeBuilder, AccountId::new([0xee; 32]))
    }

    #[test]
    fn plan_contains_all_three_instructions_in_order() {
        let plan = setup().plan_for(
            AccountId::new([1; 32]),
            vec![Member::with_all_flags(AccountId::new([2; 32]))],
        );
        let tags: Vec<u8> = plan.instructions.iter().map(|ix| ix.data[0]).collect();
        assert_eq!(tags, vec![1, 2, 3]);
    }

    #[test]
    fn plan_lifecycle_starts_at_created() {
        let plan = setup().plan_for(AccountId::new([1; 32]), vec![]);
        assert_eq!(plan.lifecycle.state(), PermissionState::Created);
    }

    #[test]
    fn participant_fanout_builds_one_plan_each() {
        let participants = vec![
            (AccountId::new([1; 32]), vec![]),
            (AccountId::new([2; 32]), vec![]),
            (AccountId::new([3; 32]), vec![]),
        ];
        let plans = setup().plan_for_participants(&participants);
        assert_eq!(plans.len(), 3);
        for (plan, (account, _)) in plans.iter().zip(&participants) {
            assert_eq!(plan.lifecycle.account(), *account);
            assert_eq!(plan.instructions.len(), 3);
        }
    }
}
