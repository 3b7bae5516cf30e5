//! # Encryption-Service Adapter
//!
//! HTTP implementation of [`EncryptionService`]. The plaintext amount
//! is serialized only inside this adapter, in a buffer zeroized on
//! drop; copies the HTTP client makes during transmission are outside
//! that buffer's reach. Nothing downstream of the adapter ever sees
//! more than the opaque ciphertext.

use serde::Deserialize;
use zeroize::Zeroizing;

use veil_core::Ciphertext;
use veil_venue::{EncryptionService, VenueError};

use crate::http::{build_client, normalize_base_url, DEFAULT_TIMEOUT_SECS};
use crate::retry::{retry_send, RetryPolicy};

/// Configuration for the encryption-service adapter.
#[derive(Debug, Clone)]
pub struct EncryptionConfig {
    /// Base URL of the encryption service API.
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,
    /// Transport retry budget and backoff.
    pub retry: RetryPolicy,
}

impl EncryptionConfig {
    /// Create a configuration with the default timeout and retry policy.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry: RetryPolicy::default(),
        }
    }
}

/// HTTP client for the encryption service.
#[derive(Debug)]
pub struct HttpEncryptionService {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

#[derive(Deserialize)]
struct EncryptResponse {
    /// Hex-encoded ciphertext bytes.
    ciphertext: String,
}

impl HttpEncryptionService {
    /// Create an adapter from configuration.
    pub fn new(config: EncryptionConfig) -> Result<Self, VenueError> {
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
}

impl EncryptionService for HttpEncryptionService {
    async fn encrypt(&self, amount: u128) -> Result<Ciphertext, VenueError> {
        let url = format!("{}/v1/encrypt", self.base_url);
        // The only plaintext serialization in the process. The master
        // buffer is wiped on drop; each request body is a copy that
        // leaves the process with the request.
        let body = Zeroizing::new(format!("{{\"plaintext\":\"{amount}\"}}"));

        let resp = retry_send(self.retry, || {
            self.client
                .post(&url)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(Vec::from(body.as_bytes()))
                .send()
        })
        .await
        .map_err(|e| VenueError::Transport {
            reason: format!("encrypt: {e}"),
        })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(VenueError::Encoding {
                reason: format!("encrypt: HTTP {status}: {text}"),
            });
        }
        let parsed: EncryptResponse = resp.json().await.map_err(|e| VenueError::Encoding {
            reason: format!("encrypt: response deserialization failed: {e}"),
        })?;
        let bytes = hex::decode(&parsed.ciphertext).map_err(|e| VenueError::Encoding {
            reason: format!("encrypt: non-hex ciphertext in response: {e}"),
        })?;
        Ok(Ciphertext::from_bytes(bytes))
    }
}
