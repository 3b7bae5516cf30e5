//! # Venue Selection
//!
//! Chooses where a built transaction may run. The delegated venue offers
//! private execution but requires every participating account to be
//! delegated and active; the base ledger is always available.

use serde::{Deserialize, Serialize};

use veil_permission::{all_active, PermissionState};

/// An execution venue for a built transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    /// The base ledger. Always a valid target.
    Base,
    /// The delegated, permissioned execution venue. Valid only when
    /// every participating account's permission is `Active`.
    Delegated,
}

impl std::fmt::Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Delegated => write!(f, "delegated"),
        }
    }
}

/// Select the venue for an operation touching the given accounts.
///
/// Delegated only if the participant list is non-empty and every
/// participant is `Active`. An empty participant list means the caller
/// has not established any delegation, so the base ledger is the only
/// defensible target.
pub fn select_venue(participant_states: &[PermissionState]) -> Venue {
    if !participant_states.is_empty() && all_active(participant_states) {
        Venue::Delegated
    } else {
        tracing::debug!(
            participants = participant_states.len(),
            inactive = participant_states
                .iter()
                .filter(|s| **s != PermissionState::Active)
                .count(),
            "venue gating: falling back to base ledger"
        );
        Venue::Base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PermissionState::*;

    #[test]
    fn all_active_targets_delegated() {
        assert_eq!(select_venue(&[Active, Active, Active, Active]), Venue::Delegated);
    }

    #[test]
    fn one_created_account_forces_base() {
        // The venue-gating property: one Active and one merely Created
        // participant must select the base venue.
        assert_eq!(select_venue(&[Active, Created]), Venue::Base);
    }

    #[test]
    fn pending_delegation_forces_base() {
        assert_eq!(
            select_venue(&[Active, Active, DelegationRequested, Active]),
            Venue::Base
        );
    }

    #[test]
    fn terminal_states_force_base() {
        assert_eq!(select_venue(&[Active, TimedOut]), Venue::Base);
        assert_eq!(select_venue(&[Failed]), Venue::Base);
    }

    #[test]
    fn empty_participants_force_base() {
        assert_eq!(select_venue(&[]), Venue::Base);
    }
}
