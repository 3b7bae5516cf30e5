//! # Ciphertext Amount Pipeline
//!
//! Every amount entering a transaction instruction — deposit, withdraw,
//! swap-in, swap-out, fee — passes through the encryption service before
//! it crosses the system boundary. From that point on the stack treats
//! amounts as opaque blobs; no plaintext is cached beyond the call that
//! needed it, and no plaintext recovery exists at this layer.

use veil_core::{AccountId, Ciphertext, MintId, MintPair, Pool, PoolConfig};

use crate::error::VenueError;

/// The encryption capability. Implemented by the HTTP encryption-service
/// adapter in `veil-client` and by fakes in tests.
///
/// The scheme is non-deterministic: repeated calls with the same
/// plaintext are not required to (and generally will not) produce equal
/// ciphertexts.
pub trait EncryptionService: Send + Sync {
    /// Encrypt a plaintext amount into an opaque ciphertext.
    fn encrypt(
        &self,
        amount: u128,
    ) -> impl std::future::Future<Output = Result<Ciphertext, VenueError>> + Send;
}

/// The three encrypted arguments of a swap-exact-in instruction.
#[derive(Debug, Clone)]
pub struct SwapAmounts {
    /// Encrypted input amount (already net of fees).
    pub amount_in: Ciphertext,
    /// Encrypted expected output amount.
    pub amount_out: Ciphertext,
    /// Encrypted protocol fee amount.
    pub fee: Ciphertext,
}

/// Converts plaintext quantities to ciphertext at the system boundary.
#[derive(Debug, Clone)]
pub struct AmountPipeline<E> {
    service: E,
}

impl<E: EncryptionService> AmountPipeline<E> {
    /// Wrap an encryption service.
    pub fn new(service: E) -> Self {
        Self { service }
    }

    /// Encrypt one amount.
    pub async fn encrypt_amount(&self, amount: u128) -> Result<Ciphertext, VenueError> {
        let ciphertext = self.service.encrypt(amount).await?;
        if ciphertext.is_empty() {
            return Err(VenueError::Encoding {
                reason: "encryption service returned an empty ciphertext".into(),
            });
        }
        Ok(ciphertext)
    }

    /// Encrypt an (a, b) amount pair, for liquidity operations.
    pub async fn encrypt_pair(
        &self,
        amount_a: u128,
        amount_b: u128,
    ) -> Result<(Ciphertext, Ciphertext), VenueError> {
        Ok((
            self.encrypt_amount(amount_a).await?,
            self.encrypt_amount(amount_b).await?,
        ))
    }

    /// Encrypt the three swap arguments.
    pub async fn encrypt_swap(
        &self,
        amount_in: u128,
        amount_out: u128,
        fee: u128,
    ) -> Result<SwapAmounts, VenueError> {
        Ok(SwapAmounts {
            amount_in: self.encrypt_amount(amount_in).await?,
            amount_out: self.encrypt_amount(amount_out).await?,
            fee: self.encrypt_amount(fee).await?,
        })
    }
}

fn take<'a>(data: &mut &'a [u8], n: usize, what: &str) -> Result<&'a [u8], VenueError> {
    if data.len() < n {
        return Err(VenueError::Encoding {
            reason: format!("pool payload truncated reading {what}"),
        });
    }
    let (head, tail) = data.split_at(n);
    *data = tail;
    Ok(head)
}

fn take_key(data: &mut &[u8], what: &str) -> Result<[u8; 32], VenueError> {
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(take(data, 32, what)?);
    Ok(bytes)
}

fn take_ciphertext(data: &mut &[u8], what: &str) -> Result<Ciphertext, VenueError> {
    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(take(data, 4, what)?);
    let len = u32::from_le_bytes(len_bytes) as usize;
    if len == 0 {
        // Encrypted zero still carries ciphertext bytes; an empty slot is
        // a corrupt record, never a zero balance.
        return Err(VenueError::Encoding {
            reason: format!("pool payload has an empty ciphertext slot for {what}"),
        });
    }
    Ok(Ciphertext::from_bytes(take(data, len, what)?.to_vec()))
}

/// Decode a pool record payload into the client-side [`Pool`] model.
///
/// The layout mirrors the on-ledger record: `fee_bps` (u16 LE),
/// authority, mint A, mint B (32 bytes each), the four ciphertext slots
/// (u32 LE length-prefixed), the pause flag (1 byte), and
/// `last_update_ts` (i64 LE). Ciphertext slots stay opaque — no
/// plaintext recovery happens here; validation covers structure and the
/// fee range only. A zero-length payload for a pool known to exist
/// signals a resolution or encoding failure.
pub fn decode_pool(data: &[u8]) -> Result<Pool, VenueError> {
    if data.is_empty() {
        return Err(VenueError::Encoding {
            reason: "pool payload is empty; expected ciphertext reserve slots".into(),
        });
    }
    let mut rest = data;
    let mut fee_bytes = [0u8; 2];
    fee_bytes.copy_from_slice(take(&mut rest, 2, "fee_bps")?);
    let fee_bps = u16::from_le_bytes(fee_bytes);
    let authority = AccountId::new(take_key(&mut rest, "authority")?);
    let mint_a = MintId::new(take_key(&mut rest, "mint_a")?);
    let mint_b = MintId::new(take_key(&mut rest, "mint_b")?);
    let mints = MintPair::normalized(mint_a, mint_b).map_err(|e| VenueError::Encoding {
        reason: format!("pool payload carries an invalid mint pair: {e}"),
    })?;
    let config = PoolConfig::new(mints, authority, fee_bps).map_err(|e| VenueError::Encoding {
        reason: format!("pool payload failed config validation: {e}"),
    })?;
    let reserve_a = take_ciphertext(&mut rest, "reserve_a")?;
    let reserve_b = take_ciphertext(&mut rest, "reserve_b")?;
    let protocol_fee_a = take_ciphertext(&mut rest, "protocol_fee_a")?;
    let protocol_fee_b = take_ciphertext(&mut rest, "protocol_fee_b")?;
    let is_paused = take(&mut rest, 1, "is_paused")?[0] != 0;
    let mut ts_bytes = [0u8; 8];
    ts_bytes.copy_from_slice(take(&mut rest, 8, "last_update_ts")?);
    let last_update_ts = i64::from_le_bytes(ts_bytes);
    if !rest.is_empty() {
        return Err(VenueError::Encoding {
            reason: format!("pool payload has {} trailing bytes", rest.len()),
        });
    }
    Ok(Pool {
        config,
        reserve_a,
        reserve_b,
        protocol_fee_a,
        protocol_fee_b,
        is_paused,
        last_update_ts,
    })
}

/// Encode a [`Pool`] into the record payload layout [`decode_pool`]
/// reads. The ledger program is the writer of record; this mirror exists
/// for fixtures and local inspection tooling.
pub fn encode_pool(pool: &Pool) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&pool.config.fee_bps.to_le_bytes());
    data.extend_from_slice(pool.config.authority.as_bytes());
    data.extend_from_slice(pool.config.mints.mint_a().as_bytes());
    data.extend_from_slice(pool.config.mints.mint_b().as_bytes());
    for slot in [
        &pool.reserve_a,
        &pool.reserve_b,
        &pool.protocol_fee_a,
        &pool.protocol_fee_b,
    ] {
        data.extend_from_slice(&(slot.len() as u32).to_le_bytes());
        data.extend_from_slice(slot.as_bytes());
    }
    data.push(pool.is_paused as u8);
    data.extend_from_slice(&pool.last_update_ts.to_le_bytes());
    data
}
