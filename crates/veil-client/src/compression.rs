//! # Compressed-State Indexer Adapter
//!
//! HTTP implementation of [`CompressedStateStore`] against a compressed-
//! state indexer: owned-account enumeration and inclusion-proof fetch.
//! All failures map to [`ResolveError::Backend`]; "no matching account"
//! is the resolver's judgement, not this adapter's.

use serde::{Deserialize, Serialize};

use veil_core::{ContentHash, ProgramId};
use veil_resolver::{CompressedAccountRecord, CompressedStateStore, InclusionProof, ResolveError};

use crate::http::{build_client, normalize_base_url, DEFAULT_TIMEOUT_SECS};
use crate::retry::{retry_send, RetryPolicy};

/// Configuration for the compressed-state indexer adapter.
#[derive(Debug, Clone)]
pub struct CompressedStateConfig {
    /// Base URL of the indexer API.
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,
    /// Transport retry budget and backoff.
    pub retry: RetryPolicy,
}

impl CompressedStateConfig {
    /// Create a configuration with the default timeout and retry policy.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry: RetryPolicy::default(),
        }
    }
}

/// HTTP client for the compressed-state indexer.
#[derive(Debug)]
pub struct HttpCompressedStateStore {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct AccountsByOwnerRequest {
    owner: ProgramId,
}

#[derive(Deserialize)]
struct AccountsByOwnerResponse {
    accounts: Vec<CompressedAccountRecord>,
}

#[derive(Serialize)]
struct ProofsRequest<'a> {
    hashes: &'a [ContentHash],
}

#[derive(Deserialize)]
struct ProofsResponse {
    proofs: Vec<InclusionProof>,
}

impl HttpCompressedStateStore {
    /// Create an adapter from configuration.
    pub fn new(config: CompressedStateConfig) -> Result<Self, ResolveError> {
        let base_url = normalize_base_url(&config.base_url)
            .map_err(|reason| ResolveError::Backend { reason })?;
        let client =
            build_client(config.timeout_secs).map_err(|reason| ResolveError::Backend { reason })?;
        Ok(Self {
            client,
            base_url,
            retry: config.retry,
        })
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
    ) -> Result<T, ResolveError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let resp = retry_send(self.retry, || self.client.post(&url).json(body).send())
            .await
            .map_err(|e| ResolveError::Backend {
                reason: format!("{endpoint}: {e}"),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ResolveError::Backend {
                reason: format!("{endpoint}: HTTP {status}: {body}"),
            });
        }
        resp.json().await.map_err(|e| ResolveError::Backend {
            reason: format!("{endpoint}: response deserialization failed: {e}"),
        })
    }
}

impl CompressedStateStore for HttpCompressedStateStore {
    async fn accounts_by_owner(
        &self,
        program: ProgramId,
    ) -> Result<Vec<CompressedAccountRecord>, ResolveError> {
        let resp: AccountsByOwnerResponse = self
            .post_json("v1/accounts-by-owner", &AccountsByOwnerRequest { owner: program })
            .await?;
        tracing::debug!(
            program = %program,
            accounts = resp.accounts.len(),
            "fetched owned compressed accounts"
        );
        Ok(resp.accounts)
    }

    async fn proofs_for(
        &self,
        hashes: &[ContentHash],
    ) -> Result<Vec<InclusionProof>, ResolveError> {
        let resp: ProofsResponse = self
            .post_json("v1/inclusion-proofs", &ProofsRequest { hashes })
            .await?;
        Ok(resp.proofs)
    }
}
