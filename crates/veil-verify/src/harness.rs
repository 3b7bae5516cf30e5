//! # Layer Verification Harness
//!
//! Runs a fixed, ordered checklist against each stack layer and
//! accumulates every outcome. Checks never short-circuit: a failed check
//! is recorded and the rest of the checklist still runs, so one broken
//! layer cannot hide the condition of another. A check that cannot be
//! evaluated because an earlier check in its layer failed records a
//! dependent failure naming the blocker.
//!
//! Every check fetches remote state fresh at evaluation time. Nothing is
//! cached between checks — a permission observed `Active` during
//! verification is re-observed, not assumed, by whatever operation runs
//! next.

use chrono::Utc;
use tracing::info;

use veil_core::{AccountId, MintPair, ProgramId};
use veil_permission::{reconfirm_active, DelegationStatusSource};
use veil_resolver::{CompressedStateStore, ResolveError, Resolver};
use veil_venue::{
    classify_simulation, decode_pool, AmountPipeline, EncryptionService,
    IncompatibilitySignatures, LedgerQuery, SimulationVerdict, TransactionPlan, Venue,
    VenueAuthenticator, VenueExecutor,
};

use crate::report::{CheckLayer, CheckResult, CompatibilityReport};

// Compression layer checklist.
const POOL_EXISTS: &str = "pool-account-exists";
const PROOF_AVAILABLE: &str = "inclusion-proof-available";
const PAYLOAD_SHAPE: &str = "pool-payload-shape";
// Encryption layer checklist.
const SERVICE_DEPLOYED: &str = "encryption-program-deployed";
const CIPHERTEXT_SHAPE: &str = "ciphertext-payload-shape";
// Delegated execution checklist.
const VENUE_AUTH: &str = "venue-authentication";
const PERMISSIONS_ACTIVE: &str = "permissions-active";
const CROSS_PROGRAM: &str = "cross-program-accessibility";
const SWAP_SIMULATION: &str = "swap-simulation";

// Probe plaintext for the ciphertext-shape check. The value is
// arbitrary; only the returned ciphertext's shape is observed.
const PROBE_AMOUNT: u128 = 1;

/// The two transactions dry-run on the delegated venue.
#[derive(Debug, Clone)]
pub struct DelegatedProbePlans {
    /// A minimal transaction touching the swap program, exercising
    /// foreign-program access from inside the venue.
    pub accessibility: TransactionPlan,
    /// The full swap transaction whose venue is being decided.
    pub swap: TransactionPlan,
}

/// Probes compressed pool state: existence, proof, payload shape.
pub struct CompressionProbe<'a, S> {
    resolver: &'a Resolver<S>,
}

impl<'a, S: CompressedStateStore> CompressionProbe<'a, S> {
    pub fn new(resolver: &'a Resolver<S>) -> Self {
        Self { resolver }
    }

    /// Run the compression checklist for a pool.
    pub async fn run(&self, mints: &MintPair) -> Vec<CheckResult> {
        let layer = CheckLayer::Compression;
        let address = self.resolver.pool_address(mints);
        let mut checks = Vec::with_capacity(3);

        let exists = match self.resolver.lookup(address).await {
            Ok(record) => {
                checks.push(CheckResult::pass(
                    layer,
                    POOL_EXISTS,
                    format!("pool account at {}, leaf {}", address, record.leaf_index),
                ));
                true
            }
            Err(err) => {
                checks.push(CheckResult::fail(
                    layer,
                    POOL_EXISTS,
                    format!("no pool account at {address}"),
                    err.to_string(),
                ));
                false
            }
        };

        // Proof and payload checks re-fetch the record: the tree may have
        // advanced since the existence check observed it.
        if exists {
            checks.push(self.proof_check(address).await);
            checks.push(self.payload_check(address).await);
        } else {
            checks.push(CheckResult::dependent(layer, PROOF_AVAILABLE, POOL_EXISTS));
            checks.push(CheckResult::dependent(layer, PAYLOAD_SHAPE, POOL_EXISTS));
        }
        checks
    }

    async fn proof_check(&self, address: veil_core::LogicalAddress) -> CheckResult {
        let layer = CheckLayer::Compression;
        match self.resolver.resolve(address).await {
            Ok(resolved) => CheckResult::pass(
                layer,
                PROOF_AVAILABLE,
                format!(
                    "proof at root index {} with {} siblings",
                    resolved.proof.root_index,
                    resolved.proof.siblings.len()
                ),
            ),
            Err(err @ ResolveError::NotFound { .. }) => CheckResult::fail(
                layer,
                PROOF_AVAILABLE,
                "account vanished between checks",
                err.to_string(),
            ),
            Err(err) => CheckResult::fail(
                layer,
                PROOF_AVAILABLE,
                "no inclusion proof for current content hash",
                err.to_string(),
            ),
        }
    }

    async fn payload_check(&self, address: veil_core::LogicalAddress) -> CheckResult {
        let layer = CheckLayer::Compression;
        match self.resolver.lookup(address).await {
            Ok(record) => match decode_pool(&record.data) {
                Ok(pool) => CheckResult::pass(
                    layer,
                    PAYLOAD_SHAPE,
                    format!(
                        "pool decodes: fee {} bps, paused={}",
                        pool.config.fee_bps, pool.is_paused
                    ),
                ),
                Err(err) => CheckResult::fail(
                    layer,
                    PAYLOAD_SHAPE,
                    "pool payload failed shape validation",
                    err.to_string(),
                ),
            },
            Err(err) => CheckResult::fail(
                layer,
                PAYLOAD_SHAPE,
                "account vanished between checks",
                err.to_string(),
            ),
        }
    }
}

/// Probes the encryption layer: program deployment and ciphertext shape.
pub struct EncryptionProbe<'a, L, E> {
    ledger: &'a L,
    pipeline: &'a AmountPipeline<E>,
    encryption_program: ProgramId,
}

impl<'a, L: LedgerQuery, E: EncryptionService> EncryptionProbe<'a, L, E> {
    pub fn new(ledger: &'a L, pipeline: &'a AmountPipeline<E>, encryption_program: ProgramId) -> Self {
        Self {
            ledger,
            pipeline,
            encryption_program,
        }
    }

    /// Run the encryption checklist.
    ///
    /// The two checks are independent: the shape check talks to the
    /// encryption service directly and runs even when the on-ledger
    /// program lookup failed.
    pub async fn run(&self) -> Vec<CheckResult> {
        let layer = CheckLayer::Encryption;
        let mut checks = Vec::with_capacity(2);

        checks.push(match self.ledger.account_info(self.encryption_program.0).await {
            Ok(info) if info.exists && info.executable => CheckResult::pass(
                layer,
                SERVICE_DEPLOYED,
                format!("program {} deployed and executable", self.encryption_program),
            ),
            Ok(info) => CheckResult::fail(
                layer,
                SERVICE_DEPLOYED,
                format!("program {} not usable", self.encryption_program),
                format!("exists={}, executable={}", info.exists, info.executable),
            ),
            Err(err) => CheckResult::fail(
                layer,
                SERVICE_DEPLOYED,
                "ledger query failed",
                err.to_string(),
            ),
        });

        checks.push(match self.pipeline.encrypt_amount(PROBE_AMOUNT).await {
            Ok(ciphertext) => CheckResult::pass(
                layer,
                CIPHERTEXT_SHAPE,
                format!("probe encrypted to {} bytes", ciphertext.len()),
            ),
            Err(err) => CheckResult::fail(
                layer,
                CIPHERTEXT_SHAPE,
                "encryption service did not produce a usable ciphertext",
                err.to_string(),
            ),
        });
        checks
    }
}

/// Probes the delegated venue: authentication, permission activation,
/// then two dry-runs.
pub struct DelegationProbe<'a, A, D, X> {
    authenticator: &'a A,
    status_source: &'a D,
    executor: &'a X,
    signatures: IncompatibilitySignatures,
}

impl<'a, A, D, X> DelegationProbe<'a, A, D, X>
where
    A: VenueAuthenticator,
    D: DelegationStatusSource,
    X: VenueExecutor,
{
    pub fn new(
        authenticator: &'a A,
        status_source: &'a D,
        executor: &'a X,
        signatures: IncompatibilitySignatures,
    ) -> Self {
        Self {
            authenticator,
            status_source,
            executor,
            signatures,
        }
    }

    /// Run the delegated-execution checklist over the participating
    /// accounts. All later checks talk to the venue through the session
    /// the authentication check establishes, so an authentication
    /// failure blocks the rest of this layer.
    pub async fn run(&self, accounts: &[AccountId], plans: &DelegatedProbePlans) -> Vec<CheckResult> {
        let layer = CheckLayer::DelegatedExecution;
        let mut checks = Vec::with_capacity(4);

        let authenticated = match self.authenticator.authenticate().await {
            Ok(token) if !token.is_expired(Utc::now()) => {
                checks.push(CheckResult::pass(
                    layer,
                    VENUE_AUTH,
                    format!("token valid until {}", token.expires_at),
                ));
                true
            }
            Ok(token) => {
                checks.push(CheckResult::fail(
                    layer,
                    VENUE_AUTH,
                    "venue issued an already-expired token",
                    format!("expires_at={}", token.expires_at),
                ));
                false
            }
            Err(err) => {
                checks.push(CheckResult::fail(
                    layer,
                    VENUE_AUTH,
                    "authentication challenge failed",
                    err.to_string(),
                ));
                false
            }
        };

        if !authenticated {
            checks.push(CheckResult::dependent(layer, PERMISSIONS_ACTIVE, VENUE_AUTH));
            checks.push(CheckResult::dependent(layer, CROSS_PROGRAM, VENUE_AUTH));
            checks.push(CheckResult::dependent(layer, SWAP_SIMULATION, VENUE_AUTH));
            return checks;
        }

        checks.push(self.permissions_check(accounts).await);
        checks.push(
            self.simulation_check(CROSS_PROGRAM, &plans.accessibility)
                .await,
        );
        checks.push(self.simulation_check(SWAP_SIMULATION, &plans.swap).await);
        checks
    }

    async fn permissions_check(&self, accounts: &[AccountId]) -> CheckResult {
        let layer = CheckLayer::DelegatedExecution;
        let mut inactive = Vec::new();
        for &account in accounts {
            if !reconfirm_active(self.status_source, account).await {
                inactive.push(account.short());
            }
        }
        if accounts.is_empty() {
            CheckResult::fail(
                layer,
                PERMISSIONS_ACTIVE,
                "no participating accounts supplied",
                "empty participant list".to_string(),
            )
        } else if inactive.is_empty() {
            CheckResult::pass(
                layer,
                PERMISSIONS_ACTIVE,
                format!("all {} participating accounts active", accounts.len()),
            )
        } else {
            CheckResult::fail(
                layer,
                PERMISSIONS_ACTIVE,
                format!("{} of {} accounts not active", inactive.len(), accounts.len()),
                format!("inactive: {}", inactive.join(", ")),
            )
        }
    }

    async fn simulation_check(&self, name: &'static str, plan: &TransactionPlan) -> CheckResult {
        let layer = CheckLayer::DelegatedExecution;
        let outcome = match self.executor.simulate(plan).await {
            Ok(outcome) => outcome,
            Err(err) => {
                return CheckResult::fail(layer, name, "dry-run transport failed", err.to_string())
            }
        };
        match classify_simulation(&outcome, &self.signatures) {
            SimulationVerdict::Pass => {
                CheckResult::pass(layer, name, "venue accepted the transaction")
            }
            SimulationVerdict::Incompatible { marker, error } => CheckResult::fail(
                layer,
                name,
                format!("venue incompatibility (marker `{marker}`)"),
                error,
            ),
            SimulationVerdict::Rejected { error, logs } => CheckResult::fail(
                layer,
                name,
                format!("transaction rejected ({} log lines)", logs.len()),
                error,
            ),
        }
    }
}

/// Runs all three layer checklists and reports the usable venue.
pub struct VerificationHarness<'a, S, L, E, A, D, X> {
    pub compression: CompressionProbe<'a, S>,
    pub encryption: EncryptionProbe<'a, L, E>,
    pub delegation: DelegationProbe<'a, A, D, X>,
}

impl<'a, S, L, E, A, D, X> VerificationHarness<'a, S, L, E, A, D, X>
where
    S: CompressedStateStore,
    L: LedgerQuery,
    E: EncryptionService,
    A: VenueAuthenticator,
    D: DelegationStatusSource,
    X: VenueExecutor,
{
    /// Verify every layer for one pool and its participating accounts.
    ///
    /// The delegated venue is reported usable only when the end-to-end
    /// swap dry-run passed; every other failure downgrades to the base
    /// ledger while the remaining layers keep their own verdicts.
    pub async fn verify(
        &self,
        mints: &MintPair,
        accounts: &[AccountId],
        plans: &DelegatedProbePlans,
    ) -> CompatibilityReport {
        let mut checks = self.compression.run(mints).await;
        checks.extend(self.encryption.run().await);
        checks.extend(self.delegation.run(accounts, plans).await);

        let swap_passed = checks
            .iter()
            .any(|c| c.name == SWAP_SIMULATION && c.status.is_pass());
        let venue = if swap_passed {
            Venue::Delegated
        } else {
            Venue::Base
        };

        let failed = checks.iter().filter(|c| !c.status.is_pass()).count();
        info!(
            total = checks.len(),
            failed,
            venue = %venue,
            "verification complete"
        );
        CompatibilityReport { checks, venue }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::Duration;
    use veil_core::{
        Ciphertext, ContentHash, LogicalAddress, MintId, Pool, PoolConfig, QueueId, TreeId,
    };
    use veil_permission::PermissionStatus;
    use veil_resolver::{AddressScheme, CompressedAccountRecord, InclusionProof, TreeInfo};
    use veil_venue::{
        AccountInfo, AuthToken, BlockRef, SimulationOutcome, TxSignature, VenueError,
    };

    // One fixture per backend so a test can break a single layer.

    struct FakeStore {
        records: Vec<CompressedAccountRecord>,
        proofs: HashMap<ContentHash, InclusionProof>,
    }

    impl CompressedStateStore for &FakeStore {
        async fn accounts_by_owner(
            &self,
            _program: ProgramId,
        ) -> Result<Vec<CompressedAccountRecord>, ResolveError> {
            Ok(self.records.clone())
        }

        async fn proofs_for(
            &self,
            hashes: &[ContentHash],
        ) -> Result<Vec<InclusionProof>, ResolveError> {
            Ok(hashes
                .iter()
                .filter_map(|h| self.proofs.get(h).cloned())
                .collect())
        }
    }

    struct FakeLedger {
        executable: bool,
    }

    impl LedgerQuery for FakeLedger {
        async fn account_info(&self, _account: AccountId) -> Result<AccountInfo, VenueError> {
            Ok(AccountInfo {
                exists: true,
                executable: self.executable,
                owner: None,
            })
        }

        async fn latest_block_reference(&self) -> Result<BlockRef, VenueError> {
            Ok(BlockRef("block".into()))
        }
    }

    struct FakeEncryption;

    impl EncryptionService for FakeEncryption {
        async fn encrypt(&self, amount: u128) -> Result<Ciphertext, VenueError> {
            Ok(Ciphertext::from_bytes(amount.to_le_bytes().to_vec()))
        }
    }

    struct FakeAuth {
        fail: bool,
    }

    impl VenueAuthenticator for FakeAuth {
        async fn authenticate(&self) -> Result<AuthToken, VenueError> {
            if self.fail {
                return Err(VenueError::Transport {
                    reason: "challenge endpoint unreachable".into(),
                });
            }
            Ok(AuthToken {
                token: "bearer".into(),
                expires_at: Utc::now() + Duration::minutes(10),
            })
        }
    }

    struct FakeStatus {
        active: bool,
    }

    impl DelegationStatusSource for FakeStatus {
        async fn permission_status(
            &self,
            _account: AccountId,
        ) -> Result<PermissionStatus, String> {
            Ok(PermissionStatus {
                active: self.active,
                authorized_principals: vec![],
            })
        }
    }

    struct FakeExecutor {
        // Outcomes consumed in call order: accessibility probe first.
        outcomes: Mutex<Vec<SimulationOutcome>>,
    }

    impl FakeExecutor {
        fn passing() -> Self {
            Self {
                outcomes: Mutex::new(vec![SimulationOutcome::ok(), SimulationOutcome::ok()]),
            }
        }
    }

    impl VenueExecutor for FakeExecutor {
        async fn simulate(&self, _plan: &TransactionPlan) -> Result<SimulationOutcome, VenueError> {
            let mut outcomes = self.outcomes.lock().unwrap();
            Ok(if outcomes.is_empty() {
                SimulationOutcome::ok()
            } else {
                outcomes.remove(0)
            })
        }

        async fn submit(&self, _plan: &TransactionPlan) -> Result<TxSignature, VenueError> {
            Ok(TxSignature("sig".into()))
        }
    }

    fn program() -> ProgramId {
        ProgramId::new([1; 32])
    }

    fn mints() -> MintPair {
        MintPair::normalized(MintId::new([2; 32]), MintId::new([3; 32])).unwrap()
    }

    fn plan() -> TransactionPlan {
        TransactionPlan {
            fee_payer: AccountId::new([0xfe; 32]),
            block_ref: BlockRef("block".into()),
            compute_unit_limit: 400_000,
            instructions: vec![],
        }
    }

    fn plans() -> DelegatedProbePlans {
        DelegatedProbePlans {
            accessibility: plan(),
            swap: plan(),
        }
    }

    fn store_with_pool(resolver_address: LogicalAddress) -> FakeStore {
        let hash = ContentHash::new([8; 32]);
        let payload = veil_venue::encode_pool(&Pool {
            config: PoolConfig::new(mints(), AccountId::new([0xaa; 32]), 30).unwrap(),
            reserve_a: Ciphertext::from_bytes(vec![0x11; 48]),
            reserve_b: Ciphertext::from_bytes(vec![0x22; 48]),
            protocol_fee_a: Ciphertext::from_bytes(vec![0x33; 48]),
            protocol_fee_b: Ciphertext::from_bytes(vec![0x44; 48]),
            is_paused: false,
            last_update_ts: 0,
        });
        let record = CompressedAccountRecord {
            address: resolver_address,
            content_hash: hash,
            leaf_index: 4,
            tree_info: TreeInfo {
                tree: TreeId::new([5; 32]),
                queue: QueueId::new([6; 32]),
            },
            data: payload,
        };
        let mut proofs = HashMap::new();
        proofs.insert(
            hash,
            InclusionProof {
                root_index: 11,
                siblings: vec![ContentHash::new([9; 32])],
            },
        );
        FakeStore {
            records: vec![record],
            proofs,
        }
    }

    fn resolver(store: &FakeStore) -> Resolver<&FakeStore> {
        Resolver::new(store, program(), TreeId::new([5; 32]), AddressScheme::Batched)
    }

    async fn run_harness(
        store: &FakeStore,
        ledger: &FakeLedger,
        auth: &FakeAuth,
        status: &FakeStatus,
        executor: &FakeExecutor,
    ) -> CompatibilityReport {
        let resolver = resolver(store);
        let pipeline = AmountPipeline::new(FakeEncryption);
        let harness = VerificationHarness {
            compression: CompressionProbe::new(&resolver),
            encryption: EncryptionProbe::new(ledger, &pipeline, ProgramId::new([7; 32])),
            delegation: DelegationProbe::new(
                auth,
                status,
                executor,
                IncompatibilitySignatures::default(),
            ),
        };
        harness
            .verify(&mints(), &[AccountId::new([0x30; 32])], &plans())
            .await
    }

    #[tokio::test]
    async fn healthy_stack_reports_delegated_venue() {
        let store = {
            let tmp = FakeStore {
                records: vec![],
                proofs: HashMap::new(),
            };
            let address = resolver(&tmp).pool_address(&mints());
            store_with_pool(address)
        };
        let report = run_harness(
            &store,
            &FakeLedger { executable: true },
            &FakeAuth { fail: false },
            &FakeStatus { active: true },
            &FakeExecutor::passing(),
        )
        .await;
        assert_eq!(report.checks.len(), 9);
        assert!(report.failures().next().is_none(), "{}", report.summary());
        assert!(report.delegated_compatible());
    }

    #[tokio::test]
    async fn missing_pool_fails_layer_but_not_the_others() {
        let store = FakeStore {
            records: vec![],
            proofs: HashMap::new(),
        };
        let report = run_harness(
            &store,
            &FakeLedger { executable: true },
            &FakeAuth { fail: false },
            &FakeStatus { active: true },
            &FakeExecutor::passing(),
        )
        .await;
        assert!(!report.layer_passed(CheckLayer::Compression));
        // Dependent checks are recorded, not skipped.
        assert_eq!(
            report
                .checks
                .iter()
                .filter(|c| c.layer == CheckLayer::Compression)
                .count(),
            3
        );
        assert!(report
            .check(PROOF_AVAILABLE)
            .unwrap()
            .error
            .as_deref()
            .unwrap()
            .contains(POOL_EXISTS));
        // The delegated venue is still verified and usable.
        assert!(report.layer_passed(CheckLayer::DelegatedExecution));
        assert!(report.delegated_compatible());
    }

    #[tokio::test]
    async fn incompatible_swap_simulation_downgrades_to_base_venue() {
        let store = {
            let tmp = FakeStore {
                records: vec![],
                proofs: HashMap::new(),
            };
            let address = resolver(&tmp).pool_address(&mints());
            store_with_pool(address)
        };
        let executor = FakeExecutor {
            outcomes: Mutex::new(vec![
                SimulationOutcome::ok(),
                SimulationOutcome::failed("failed to clone program account", vec![]),
            ]),
        };
        let report = run_harness(
            &store,
            &FakeLedger { executable: true },
            &FakeAuth { fail: false },
            &FakeStatus { active: true },
            &executor,
        )
        .await;
        assert!(!report.delegated_compatible());
        assert_eq!(report.venue, Venue::Base);
        let swap = report.check(SWAP_SIMULATION).unwrap();
        assert!(swap.detail.contains("incompatibility"));
        // Other layers keep their independent verdicts.
        assert!(report.layer_passed(CheckLayer::Compression));
        assert!(report.layer_passed(CheckLayer::Encryption));
    }

    #[tokio::test]
    async fn auth_failure_blocks_the_rest_of_the_delegated_layer() {
        let store = FakeStore {
            records: vec![],
            proofs: HashMap::new(),
        };
        let report = run_harness(
            &store,
            &FakeLedger { executable: true },
            &FakeAuth { fail: true },
            &FakeStatus { active: true },
            &FakeExecutor::passing(),
        )
        .await;
        for name in [PERMISSIONS_ACTIVE, CROSS_PROGRAM, SWAP_SIMULATION] {
            let check = report.check(name).unwrap();
            assert!(!check.status.is_pass());
            assert!(check.error.as_deref().unwrap().contains(VENUE_AUTH));
        }
        assert_eq!(report.venue, Venue::Base);
    }

    #[tokio::test]
    async fn inactive_permission_fails_its_check_without_stopping_simulation() {
        let store = {
            let tmp = FakeStore {
                records: vec![],
                proofs: HashMap::new(),
            };
            let address = resolver(&tmp).pool_address(&mints());
            store_with_pool(address)
        };
        let report = run_harness(
            &store,
            &FakeLedger { executable: true },
            &FakeAuth { fail: false },
            &FakeStatus { active: false },
            &FakeExecutor::passing(),
        )
        .await;
        assert!(!report.check(PERMISSIONS_ACTIVE).unwrap().status.is_pass());
        // Simulations still ran and passed, so the venue is usable.
        assert!(report.check(SWAP_SIMULATION).unwrap().status.is_pass());
        assert!(report.delegated_compatible());
    }
}
