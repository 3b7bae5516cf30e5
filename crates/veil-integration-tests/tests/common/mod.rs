//! In-memory fake backends shared by the scenario tests.

// Not every test binary uses every fake.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use chrono::{Duration, Utc};

use veil_core::{
    AccountId, Ciphertext, ContentHash, MintId, MintPair, Pool, PoolConfig, ProgramId, QueueId,
    TreeId,
};
use veil_permission::{DelegationStatusSource, PermissionStatus};
use veil_resolver::{
    AddressScheme, CompressedAccountRecord, CompressedStateStore, InclusionProof, ResolveError,
    Resolver, TreeInfo,
};
use veil_venue::{
    AccountInfo, AuthToken, BlockRef, EncryptionService, LedgerQuery, SimulationOutcome,
    SwapProgramEncoder, TokenAccounts, TransactionPlan, TxSignature, VenueAuthenticator,
    VenueError, VenueExecutor,
};

pub const SWAP_PROGRAM: ProgramId = ProgramId::new([1; 32]);
pub const ADDRESS_TREE: TreeId = TreeId::new([5; 32]);

pub fn mints() -> MintPair {
    MintPair::normalized(MintId::new([2; 32]), MintId::new([3; 32])).unwrap()
}

pub fn authority() -> AccountId {
    AccountId::new([0xaa; 32])
}

pub fn encoder() -> SwapProgramEncoder {
    SwapProgramEncoder {
        program: SWAP_PROGRAM,
        token_program: ProgramId::new([0x11; 32]),
        encryption_program: ProgramId::new([0x12; 32]),
        permission_program: ProgramId::new([0x13; 32]),
    }
}

/// A pool record payload in the layout `veil_venue::decode_pool` reads.
pub fn pool_payload(paused: bool) -> Vec<u8> {
    veil_venue::encode_pool(&Pool {
        config: PoolConfig::new(mints(), authority(), 30).unwrap(),
        reserve_a: Ciphertext::from_bytes(vec![0x51; 48]),
        reserve_b: Ciphertext::from_bytes(vec![0x52; 48]),
        protocol_fee_a: Ciphertext::from_bytes(vec![0x53; 48]),
        protocol_fee_b: Ciphertext::from_bytes(vec![0x54; 48]),
        is_paused: paused,
        last_update_ts: 0,
    })
}

pub fn token_accounts() -> TokenAccounts {
    TokenAccounts {
        user_a: AccountId::new([0x20; 32]),
        user_b: AccountId::new([0x21; 32]),
        pool_a: AccountId::new([0x22; 32]),
        pool_b: AccountId::new([0x23; 32]),
    }
}

// ── Compressed state ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeStore {
    pub records: Vec<CompressedAccountRecord>,
    pub proofs: HashMap<ContentHash, InclusionProof>,
}

impl FakeStore {
    /// An empty indexer: no pool has ever been created.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An indexer holding one pool record for the standard mint pair,
    /// provable at root index `root_index`.
    pub fn with_pool(root_index: u64) -> Self {
        Self::with_pool_state(root_index, false)
    }

    /// Same as `with_pool`, with the pause flag under test control.
    pub fn with_pool_state(root_index: u64, paused: bool) -> Self {
        let address = resolver(&FakeStore::empty()).pool_address(&mints());
        let hash = ContentHash::new([8; 32]);
        let record = CompressedAccountRecord {
            address,
            content_hash: hash,
            leaf_index: 4,
            tree_info: TreeInfo {
                tree: ADDRESS_TREE,
                queue: QueueId::new([6; 32]),
            },
            data: pool_payload(paused),
        };
        let mut proofs = HashMap::new();
        proofs.insert(
            hash,
            InclusionProof {
                root_index,
                siblings: vec![ContentHash::new([9; 32]), ContentHash::new([10; 32])],
            },
        );
        Self {
            records: vec![record],
            proofs,
        }
    }
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

pub fn resolver(store: &FakeStore) -> Resolver<&FakeStore> {
    Resolver::new(store, SWAP_PROGRAM, ADDRESS_TREE, AddressScheme::Batched)
}

// ── Encryption ───────────────────────────────────────────────────────────

/// Non-deterministic fake: the plaintext is masked byte-wise and a
/// per-call counter is mixed in, so repeated encryptions differ and the
/// plaintext bytes never appear in the output.
#[derive(Default)]
pub struct CountingEncryption {
    calls: AtomicU32,
}

impl EncryptionService for CountingEncryption {
    async fn encrypt(&self, amount: u128) -> Result<Ciphertext, VenueError> {
        let nonce = self.calls.fetch_add(1, Ordering::SeqCst);
        let mut bytes: Vec<u8> = amount
            .to_le_bytes()
            .iter()
            .map(|b| b ^ 0xa5)
            .collect();
        bytes.extend_from_slice(&nonce.to_le_bytes());
        Ok(Ciphertext::from_bytes(bytes))
    }
}

// ── Base ledger ──────────────────────────────────────────────────────────

pub struct FakeLedger;

impl LedgerQuery for FakeLedger {
    async fn account_info(&self, _account: AccountId) -> Result<AccountInfo, VenueError> {
        Ok(AccountInfo {
            exists: true,
            executable: true,
            owner: None,
        })
    }

    async fn latest_block_reference(&self) -> Result<BlockRef, VenueError> {
        Ok(BlockRef("block-1".into()))
    }
}

// ── Delegated venue ──────────────────────────────────────────────────────

pub struct FakeAuth;

impl VenueAuthenticator for FakeAuth {
    async fn authenticate(&self) -> Result<AuthToken, VenueError> {
        Ok(AuthToken {
            token: "bearer".into(),
            expires_at: Utc::now() + Duration::minutes(10),
        })
    }
}

/// Reports an account inactive for its first `activate_after` probes,
/// then active.
pub struct ScriptedStatusSource {
    pub activate_after: u32,
    probes: AtomicU32,
}

impl ScriptedStatusSource {
    pub fn new(activate_after: u32) -> Self {
        Self {
            activate_after,
            probes: AtomicU32::new(0),
        }
    }

    pub fn always_active() -> Self {
        Self::new(0)
    }
}

impl DelegationStatusSource for ScriptedStatusSource {
    async fn permission_status(
        &self,
        _account: AccountId,
    ) -> Result<PermissionStatus, String> {
        let probe = self.probes.fetch_add(1, Ordering::SeqCst);
        Ok(PermissionStatus {
            active: probe >= self.activate_after,
            authorized_principals: vec![authority()],
        })
    }
}

/// A venue whose simulations replay a fixed outcome and whose
/// submissions are recorded.
pub struct FakeVenue {
    pub simulation: SimulationOutcome,
    pub submitted: Mutex<Vec<TransactionPlan>>,
}

impl FakeVenue {
    pub fn accepting() -> Self {
        Self {
            simulation: SimulationOutcome::ok(),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_with(err: &str) -> Self {
        Self {
            simulation: SimulationOutcome::failed(err, vec![]),
            submitted: Mutex::new(Vec::new()),
        }
    }
}

impl VenueExecutor for FakeVenue {
    async fn simulate(&self, _plan: &TransactionPlan) -> Result<SimulationOutcome, VenueError> {
        Ok(self.simulation.clone())
    }

    async fn submit(&self, plan: &TransactionPlan) -> Result<TxSignature, VenueError> {
        self.submitted.lock().unwrap().push(plan.clone());
        Ok(TxSignature(format!(
            "sig-{}",
            self.submitted.lock().unwrap().len()
        )))
    }
}
