//! # Delegated-Venue Adapter
//!
//! HTTP implementation of the delegated venue's three capabilities:
//! challenge-response authentication ([`VenueAuthenticator`]), permission
//! status queries ([`DelegationStatusSource`]), and transaction dry-run /
//! submission ([`VenueExecutor`]).
//!
//! ## Authentication
//!
//! The venue issues a random challenge; the client signs it with its
//! ed25519 identity key and exchanges the signature for a bearer token
//! with an expiry. Venue requests reuse the token until it is within
//! [`TOKEN_REFRESH_MARGIN_SECS`] of expiring, then re-authenticate.
//! Permission status itself is never cached — every query is a fresh
//! observation.

use chrono::{DateTime, Utc};
use ed25519_dalek::{Signer, SigningKey};
use serde::Deserialize;
use tokio::sync::Mutex;

use veil_core::AccountId;
use veil_permission::{DelegationStatusSource, PermissionStatus};
use veil_venue::{
    AuthToken, SimulationOutcome, TransactionPlan, TxSignature, VenueAuthenticator, VenueError,
    VenueExecutor,
};

use crate::http::{build_client, normalize_base_url, DEFAULT_TIMEOUT_SECS};
use crate::retry::{retry_send, RetryPolicy};

/// Re-authenticate when the cached token expires within this margin.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 30;

/// Configuration for the delegated-venue adapter.
#[derive(Debug, Clone)]
pub struct DelegatedVenueConfig {
    /// Base URL of the venue API.
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,
    /// Transport retry budget and backoff.
    pub retry: RetryPolicy,
}

impl DelegatedVenueConfig {
    /// Create a configuration with the default timeout and retry policy.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry: RetryPolicy::default(),
        }
    }
}

/// HTTP client for the delegated execution venue.
pub struct HttpDelegatedVenue {
    client: reqwest::Client,
    base_url: String,
    identity: SigningKey,
    token: Mutex<Option<AuthToken>>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for HttpDelegatedVenue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDelegatedVenue")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct ChallengeResponse {
    /// Hex-encoded challenge bytes.
    challenge: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
    expires_at: DateTime<Utc>,
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

impl HttpDelegatedVenue {
    /// Create an adapter from configuration and the client's identity key.
    pub fn new(config: DelegatedVenueConfig, identity: SigningKey) -> Result<Self, VenueError> {
        let base_url = normalize_base_url(&config.base_url)
            .map_err(|reason| VenueError::Transport { reason })?;
        let client =
            build_client(config.timeout_secs).map_err(|reason| VenueError::Transport { reason })?;
        Ok(Self {
            client,
            base_url,
            identity,
            token: Mutex::new(None),
            retry: config.retry,
        })
    }

    fn transport(endpoint: &str, e: impl std::fmt::Display) -> VenueError {
        VenueError::Transport {
            reason: format!("{endpoint}: {e}"),
        }
    }

    /// A bearer token valid for at least the refresh margin, running the
    /// challenge flow when the cached one is missing or nearly expired.
    async fn bearer(&self) -> Result<String, VenueError> {
        let mut slot = self.token.lock().await;
        let refresh_after = Utc::now() + chrono::Duration::seconds(TOKEN_REFRESH_MARGIN_SECS);
        if let Some(token) = slot.as_ref() {
            if !token.is_expired(refresh_after) {
                return Ok(token.token.clone());
            }
        }
        let fresh = self.authenticate().await?;
        let value = fresh.token.clone();
        *slot = Some(fresh);
        Ok(value)
    }

    async fn post_authorized(
        &self,
        endpoint: &str,
        plan: &TransactionPlan,
    ) -> Result<reqwest::Response, VenueError> {
        let bearer = self.bearer().await?;
        let url = format!("{}/{endpoint}", self.base_url);
        retry_send(self.retry, || {
            self.client
                .post(&url)
                .bearer_auth(&bearer)
                .json(plan)
                .send()
        })
        .await
        .map_err(|e| Self::transport(endpoint, e))
    }
}

impl VenueAuthenticator for HttpDelegatedVenue {
    async fn authenticate(&self) -> Result<AuthToken, VenueError> {
        let challenge_url = format!("{}/v1/auth/challenge", self.base_url);
        let resp = retry_send(self.retry, || self.client.get(&challenge_url).send())
            .await
            .map_err(|e| Self::transport("auth/challenge", e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::transport("auth/challenge", format!("HTTP {status}")));
        }
        let challenge: ChallengeResponse = resp
            .json()
            .await
            .map_err(|e| Self::transport("auth/challenge", e))?;
        let challenge_bytes =
            hex::decode(&challenge.challenge).map_err(|e| Self::transport("auth/challenge", e))?;

        let signature = self.identity.sign(&challenge_bytes);
        let token_url = format!("{}/v1/auth/token", self.base_url);
        let body = serde_json::json!({
            "principal": hex::encode(self.identity.verifying_key().as_bytes()),
            "challenge": challenge.challenge,
            "signature": hex::encode(signature.to_bytes()),
        });
        let resp = retry_send(self.retry, || self.client.post(&token_url).json(&body).send())
            .await
            .map_err(|e| Self::transport("auth/token", e))?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(Self::transport(
                "auth/token",
                format!("HTTP {status}: {text}"),
            ));
        }
        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| Self::transport("auth/token", e))?;
        tracing::debug!(expires_at = %token.expires_at, "venue token issued");
        Ok(AuthToken {
            token: token.token,
            expires_at: token.expires_at,
        })
    }
}

impl DelegationStatusSource for HttpDelegatedVenue {
    async fn permission_status(&self, account: AccountId) -> Result<PermissionStatus, String> {
        let bearer = self.bearer().await.map_err(|e| e.to_string())?;
        let url = format!("{}/v1/permissions/{account}", self.base_url);
        let resp = retry_send(self.retry, || self.client.get(&url).bearer_auth(&bearer).send())
            .await
            .map_err(|e| format!("permission_status: {e}"))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(format!("permission_status: HTTP {status}"));
        }
        resp.json()
            .await
            .map_err(|e| format!("permission_status: response deserialization failed: {e}"))
    }
}

impl VenueExecutor for HttpDelegatedVenue {
    async fn simulate(&self, plan: &TransactionPlan) -> Result<SimulationOutcome, VenueError> {
        let resp = self.post_authorized("v1/simulate", plan).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::transport("simulate", format!("HTTP {status}")));
        }
        resp.json().await.map_err(|e| Self::transport("simulate", e))
    }

    async fn submit(&self, plan: &TransactionPlan) -> Result<TxSignature, VenueError> {
        let resp = self.post_authorized("v1/transactions", plan).await?;
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
        tracing::info!(signature = %body.signature, "transaction confirmed on delegated venue");
        Ok(TxSignature(body.signature))
    }
}
