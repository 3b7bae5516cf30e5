//! Shared HTTP plumbing for the adapter clients.

use std::time::Duration;

use url::Url;

/// Default per-request timeout in seconds.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Validate a base URL and strip any trailing slash.
pub(crate) fn normalize_base_url(raw: &str) -> Result<String, String> {
    let parsed = Url::parse(raw).map_err(|e| format!("invalid base URL `{raw}`: {e}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("unsupported URL scheme `{}`", parsed.scheme()));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

/// Build a JSON-speaking client with a per-request timeout.
pub(crate) fn build_client(timeout_secs: u64) -> Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .default_headers({
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert(
                reqwest::header::CONTENT_TYPE,
                reqwest::header::HeaderValue::from_static("application/json"),
            );
            headers
        })
        .build()
        .map_err(|e| format!("failed to build HTTP client: {e}"))
}
