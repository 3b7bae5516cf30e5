//! Transport-level retry for adapter HTTP calls.
//!
//! Only failures that can heal on their own are replayed: connection
//! errors and timeouts. Everything else — a malformed request, a
//! redirect loop, a body failure — surfaces on the first attempt.
//! Status-code handling stays with the caller either way: a 4xx is an
//! answer, not an outage, and must never be replayed.

use std::time::Duration;

/// Retry budget and backoff shape for one adapter, carried by its
/// config struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first; zero disables retrying.
    pub max_retries: u32,
    /// Delay before the first retry, doubling on each subsequent one.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self, retries_done: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(retries_done))
    }
}

/// Whether a transport error stands a chance of healing on its own.
fn transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

/// Send an HTTP request, replaying transient transport failures per the
/// adapter's policy.
pub(crate) async fn retry_send<F, Fut>(
    policy: RetryPolicy,
    f: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut retries_done = 0;
    loop {
        let err = match f().await {
            Ok(resp) => return Ok(resp),
            Err(err) => err,
        };
        if retries_done >= policy.max_retries || !transient(&err) {
            return Err(err);
        }
        let delay = policy.backoff(retries_done);
        tracing::warn!(
            retries_done,
            max_retries = policy.max_retries,
            "transient transport error, retrying in {delay:?}: {err}"
        );
        tokio::time::sleep(delay).await;
        retries_done += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn connection_refusal_consumes_the_whole_budget() {
        let calls = AtomicU32::new(0);
        let client = reqwest::Client::new();
        // Port 9 (discard) is closed; every attempt is refused.
        let err = retry_send(fast(2), || {
            calls.fetch_add(1, Ordering::SeqCst);
            client.get("http://127.0.0.1:9/").send()
        })
        .await
        .unwrap_err();
        assert!(err.is_connect());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_budget_performs_exactly_one_attempt() {
        let calls = AtomicU32::new(0);
        let client = reqwest::Client::new();
        let result = retry_send(fast(0), || {
            calls.fetch_add(1, Ordering::SeqCst);
            client.get("http://127.0.0.1:9/").send()
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_request_is_not_replayed() {
        let calls = AtomicU32::new(0);
        let client = reqwest::Client::new();
        let result = retry_send(fast(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            client.get("not a url").send()
        })
        .await;
        assert!(result.is_err());
        // A request that cannot be built will not improve with retries.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn backoff_doubles_per_retry() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_millis(200));
        assert_eq!(policy.backoff(1), Duration::from_millis(400));
        assert_eq!(policy.backoff(2), Duration::from_millis(800));
    }
}
