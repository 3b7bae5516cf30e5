//! # Base-Ledger RPC Adapter
//!
//! HTTP implementation of [`LedgerQuery`] and [`VenueExecutor`] against
//! the base ledger's RPC surface. Submission rejections carry the
//! ledger's execution log lines; a bare status code is not diagnosable.

use serde::Deserialize;

use veil_core::AccountId;
use veil_venue::{
    AccountInfo, BlockRef, LedgerQuery, SimulationOutcome, TransactionPlan, TxSignature,
    VenueError, VenueExecutor,
};

use crate::http::{build_client, normalize_base_url, DEFAULT_TIMEOUT_SECS};
use crate::retry::{retry_send, RetryPolicy};

/// Configuration for the base-ledger RPC adapter.
#[derive(Debug, Clone)]
pub struct BaseLedgerConfig {
    /// Base URL of the ledger RPC API.
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,
    /// Transport retry budget and backoff.
    pub retry: RetryPolicy,
}

impl BaseLedgerConfig {
    /// Create a configuration with the default timeout and retry policy.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry: RetryPolicy::default(),
        }
    }
}

/// HTTP client for the base ledger.
#[derive(Debug)]
pub struct HttpBaseLedger {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

#[derive(Deserialize)]
struct BlockReferenceResponse {
    reference: String,
}

#[derive(Deserialize)]
struct SubmitResponse {
    signature: String,
}

#[derive(Deserialize, Default)]
struct RejectionBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    logs: Vec<String>,
}

impl HttpBaseLedger {
    /// Create an adapter from configuration.
    pub fn new(config: BaseLedgerConfig) -> Result<Self, VenueError> {
        let base_url = normalize_base_url(&config.base_url)
            .map_err(|reason| VenueError::Transport { reason })?;
        let client =
            build_client(config.timeout_secs).map_err(|reason| VenueError::Transport { reason })?;
        Ok(Self {
            client,
            base_url,
            retry: config.retry,
        })
    }

    fn transport(endpoint: &str, e: impl std::fmt::Display) -> VenueError {
        VenueError::Transport {
            reason: format!("{endpoint}: {e}"),
        }
    }
}

impl LedgerQuery for HttpBaseLedger {
    async fn account_info(&self, account: AccountId) -> Result<AccountInfo, VenueError> {
        let url = format!("{}/v1/accounts/{account}", self.base_url);
        let resp = retry_send(self.retry, || self.client.get(&url).send())
            .await
            .map_err(|e| Self::transport("account_info", e))?;

        if resp.status().as_u16() == 404 {
            return Ok(AccountInfo {
                exists: false,
                executable: false,
                owner: None,
            });
        }
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::transport("account_info", format!("HTTP {status}")));
        }
        resp.json()
            .await
            .map_err(|e| Self::transport("account_info", e))
    }

    async fn latest_block_reference(&self) -> Result<BlockRef, VenueError> {
        let url = format!("{}/v1/block-reference", self.base_url);
        let resp = retry_send(self.retry, || self.client.get(&url).send())
            .await
            .map_err(|e| Self::transport("latest_block_reference", e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::transport(
                "latest_block_reference",
                format!("HTTP {status}"),
            ));
        }
        let body: BlockReferenceResponse = resp
            .json()
            .await
            .map_err(|e| Self::transport("latest_block_reference", e))?;
        Ok(BlockRef(body.reference))
    }
}

impl VenueExecutor for HttpBaseLedger {
    async fn simulate(&self, plan: &TransactionPlan) -> Result<SimulationOutcome, VenueError> {
        let url = format!("{}/v1/simulate", self.base_url);
        let resp = retry_send(self.retry, || self.client.post(&url).json(plan).send())
            .await
            .map_err(|e| Self::transport("simulate", e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::transport("simulate", format!("HTTP {status}")));
        }
        resp.json().await.map_err(|e| Self::transport("simulate", e))
    }

    async fn submit(&self, plan: &TransactionPlan) -> Result<TxSignature, VenueError> {
        let url = format!("{}/v1/transactions", self.base_url);
        let resp = retry_send(self.retry, || self.client.post(&url).json(plan).send())
            .await
            .map_err(|e| Self::transport("submit", e))?;

        let status = resp.status();
        if status.is_client_error() {
            let body: RejectionBody = resp.json().await.unwrap_or_default();
            return Err(VenueError::SubmissionRejected {
                reason: if body.error.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.error
                },
                logs: body.logs,
            });
        }
        if !status.is_success() {
            return Err(Self::transport("submit", format!("HTTP {status}")));
        }
        let body: SubmitResponse = resp
            .json()
            .await
            .map_err(|e| Self::transport("submit", e))?;
        tracing::info!(signature = %body.signature, "transaction confirmed on base ledger");
        Ok(TxSignature(body.signature))
    }
}
