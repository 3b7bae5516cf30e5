//! # Activation Polling
//!
//! `DelegationRequested → Active` is reached only by observing the
//! delegated venue's status endpoint. This module is the single retry
//! loop in the veil core: re-query on a fixed interval up to a
//! caller-supplied deadline, and return a terminal outcome — never raise
//! on timeout, never block past the deadline.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use veil_core::AccountId;

use crate::state::PermissionState;

/// A venue's report on one account's permission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionStatus {
    /// Whether the venue considers the account delegated and active.
    pub active: bool,
    /// Principals the venue will authorize for this account.
    pub authorized_principals: Vec<AccountId>,
}

/// The delegated venue's account-status capability.
///
/// Implemented by the HTTP venue client in `veil-client` and by fakes in
/// tests. Each call is a fresh observation; the implementation must not
/// cache across calls.
pub trait DelegationStatusSource: Send + Sync {
    /// Query the venue for the account's current permission status.
    fn permission_status(
        &self,
        account: AccountId,
    ) -> impl std::future::Future<Output = Result<PermissionStatus, String>> + Send;
}

/// Terminal outcome of an activation wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The venue reported the account active within the deadline.
    Active,
    /// The deadline elapsed first. The caller decides whether that is
    /// fatal — retrying with a longer deadline is always safe.
    TimedOut,
}

/// Polling parameters.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Fixed interval between status probes.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
        }
    }
}

/// Poll the venue until it reports `account` active or `deadline`
/// elapses.
///
/// Always performs at least one immediate probe, so a zero deadline
/// still observes current state; it never sleeps past the deadline.
/// Backend errors during a probe are logged and treated as "not yet
/// active" — a flaky status endpoint must not abort the wait early.
pub async fn wait_until_active<S: DelegationStatusSource>(
    source: &S,
    account: AccountId,
    deadline: Duration,
    config: PollConfig,
) -> Activation {
    let started = tokio::time::Instant::now();
    loop {
        match source.permission_status(account).await {
            Ok(status) if status.active => {
                tracing::debug!(
                    account = %account.short(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "permission active"
                );
                return Activation::Active;
            }
            Ok(_) => {}
            Err(reason) => {
                tracing::warn!(
                    account = %account.short(),
                    %reason,
                    "permission status probe failed, will re-poll"
                );
            }
        }

        let elapsed = started.elapsed();
        if elapsed >= deadline {
            tracing::debug!(
                account = %account.short(),
                deadline_ms = deadline.as_millis() as u64,
                "activation wait timed out"
            );
            return Activation::TimedOut;
        }
        // Never sleep past the deadline.
        let remaining = deadline - elapsed;
        tokio::time::sleep(config.interval.min(remaining)).await;
    }
}

/// Re-confirm `Active` with a single fresh probe, immediately before a
/// dependent operation.
///
/// An `Active` observed by an earlier poll may have reverted (validator
/// rotation, venue restart). Dependent operations call this instead of
/// trusting cached state.
pub async fn reconfirm_active<S: DelegationStatusSource>(source: &S, account: AccountId) -> bool {
    matches!(
        source.permission_status(account).await,
        Ok(PermissionStatus { active: true, .. })
    )
}

/// Whether every participating account's permission is `Active`.
///
/// Partial activation (pool active, one balance account not) is a valid
/// but unusable intermediate: the venue selector must keep refusing the
/// delegated venue until this returns true.
pub fn all_active<'a, I: IntoIterator<Item = &'a PermissionState>>(states: I) -> bool {
    states
        .into_iter()
        .all(|state| *state == PermissionState::Active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Reports active only from the `activate_after`-th probe onwards.
    struct CountingSource {
        probes: AtomicU32,
        activate_after: u32,
    }

    impl CountingSource {
        fn new(activate_after: u32) -> Self {
            Self {
                probes: AtomicU32::new(0),
                activate_after,
            }
        }

        fn probe_count(&self) -> u32 {
            self.probes.load(Ordering::SeqCst)
        }
    }

    impl DelegationStatusSource for CountingSource {
        async fn permission_status(&self, _account: AccountId) -> Result<PermissionStatus, String> {
            let n = self.probes.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(PermissionStatus {
                active: n >= self.activate_after,
                authorized_principals: vec![],
            })
        }
    }

    fn account() -> AccountId {
        AccountId::new([9u8; 32])
    }

    #[tokio::test(start_paused = true)]
    async fn activates_once_venue_reports_active() {
        let source = CountingSource::new(3);
        let outcome = wait_until_active(
            &source,
            account(),
            Duration::from_secs(10),
            PollConfig::default(),
        )
        .await;
        assert_eq!(outcome, Activation::Active);
        assert_eq!(source.probe_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_deadline_probes_once_and_times_out() {
        let source = CountingSource::new(u32::MAX);
        let outcome =
            wait_until_active(&source, account(), Duration::ZERO, PollConfig::default()).await;
        assert_eq!(outcome, Activation::TimedOut);
        assert_eq!(source.probe_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_deadline_on_already_active_account_succeeds() {
        let source = CountingSource::new(1);
        let outcome =
            wait_until_active(&source, account(), Duration::ZERO, PollConfig::default()).await;
        assert_eq!(outcome, Activation::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_bounds_total_wait() {
        let source = CountingSource::new(u32::MAX);
        let started = tokio::time::Instant::now();
        let outcome = wait_until_active(
            &source,
            account(),
            Duration::from_millis(1200),
            PollConfig {
                interval: Duration::from_millis(500),
            },
        )
        .await;
        assert_eq!(outcome, Activation::TimedOut);
        // Final sleep is clamped to the remaining time, so the total wait
        // never exceeds the deadline.
        assert!(started.elapsed() <= Duration::from_millis(1200) + Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn probe_errors_do_not_abort_the_wait() {
        struct FlakyThenActive {
            probes: AtomicU32,
        }

        impl DelegationStatusSource for FlakyThenActive {
            async fn permission_status(
                &self,
                _account: AccountId,
            ) -> Result<PermissionStatus, String> {
                let n = self.probes.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err("connection reset".into())
                } else {
                    Ok(PermissionStatus {
                        active: true,
                        authorized_principals: vec![],
                    })
                }
            }
        }

        let source = FlakyThenActive {
            probes: AtomicU32::new(0),
        };
        let outcome = wait_until_active(
            &source,
            account(),
            Duration::from_secs(5),
            PollConfig::default(),
        )
        .await;
        assert_eq!(outcome, Activation::Active);
    }

    #[tokio::test]
    async fn reconfirm_is_a_single_probe() {
        let source = CountingSource::new(1);
        assert!(reconfirm_active(&source, account()).await);
        assert_eq!(source.probe_count(), 1);
    }

    // Downstream crates import these from the crate root, not the module.
    #[tokio::test]
    async fn poll_helpers_are_exported_at_the_crate_root() {
        let source = CountingSource::new(1);
        assert!(crate::reconfirm_active(&source, account()).await);
        assert!(crate::all_active(&[PermissionState::Active]));
    }

    #[test]
    fn all_active_requires_every_state() {
        use PermissionState::*;
        assert!(all_active(&[Active, Active, Active, Active]));
        assert!(!all_active(&[Active, Created, Active, Active]));
        assert!(!all_active(&[Active, DelegationRequested]));
        assert!(all_active(&[]));
    }
}
