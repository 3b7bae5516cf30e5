//! # Delegated-Venue Authentication
//!
//! The delegated venue authenticates clients with a signed challenge and
//! answers with a bearer token carrying an expiry. Token acquisition is a
//! capability trait; the signing flow lives in the HTTP adapter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::VenueError;

/// A bearer token issued by the delegated venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    /// Opaque bearer token for venue requests.
    pub token: String,
    /// Expiry timestamp. Requests after this instant are rejected by the
    /// venue; callers re-authenticate rather than refresh.
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    /// Whether the token is already expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Challenge-response authentication against the delegated venue.
pub trait VenueAuthenticator: Send + Sync {
    /// Run the challenge flow and obtain a fresh token.
    fn authenticate(
        &self,
    ) -> impl std::future::Future<Output = Result<AuthToken, VenueError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn expiry_is_inclusive_at_the_boundary() {
        let now = Utc::now();
        let token = AuthToken {
            token: "t".into(),
            expires_at: now,
        };
        assert!(token.is_expired(now));
        assert!(!token.is_expired(now - Duration::seconds(1)));
    }
}
