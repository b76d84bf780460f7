use std::sync::Arc;

use chrono::Utc;

use crate::error::{ClientError, Result};
use crate::models::session::{Credentials, CurrentSession};
use crate::models::user::UserProfile;
use crate::session::token;
use crate::storage::kv::KeyValueStore;

/// The storage key holding the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// The storage key holding the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
/// The storage key holding the JSON-serialized user profile.
pub const USER_KEY: &str = "user";

/// The tier currently holding credentials, with the durable tier preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveTier {
    /// The durable tier holds an access token.
    Durable,
    /// The ephemeral tier holds an access token.
    Ephemeral,
    /// Neither tier holds an access token.
    None,
}

/// The single source of truth for "who is logged in, with what token, stored
/// where".
///
/// Holds two storage tiers: a durable one that survives restarts (selected by
/// "keep me logged in") and an ephemeral one scoped to the process. At most
/// one tier holds live credentials at a time; logout clears both.
#[derive(Clone)]
pub struct SessionStore {
    durable: Arc<dyn KeyValueStore>,
    ephemeral: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    /// Creates a `SessionStore` over the given tiers.
    pub fn new(durable: Arc<dyn KeyValueStore>, ephemeral: Arc<dyn KeyValueStore>) -> Self {
        Self { durable, ephemeral }
    }

    /// Persists a full set of credentials into one tier.
    ///
    /// Validates that the access token decodes and carries both an expiry and
    /// a subject identifier before anything is written; a malformed token
    /// fails with `ClientError::InvalidCredentials` and leaves storage
    /// untouched. The non-chosen tier is deliberately not cleared here —
    /// clearing belongs to logout, not login.
    ///
    /// # Arguments
    ///
    /// * `credentials` - The access token, optional refresh token, and user profile.
    /// * `keep_logged_in` - Selects the durable tier when `true`.
    pub fn persist(&self, credentials: &Credentials, keep_logged_in: bool) -> Result<()> {
        let claims = token::decode_claims(&credentials.access_token)?;
        if claims.exp.is_none() {
            return Err(ClientError::InvalidCredentials(
                "Access token carries no expiry claim".to_string(),
            ));
        }
        if !claims.has_subject() {
            return Err(ClientError::InvalidCredentials(
                "Access token carries no subject claim".to_string(),
            ));
        }

        let tier: &dyn KeyValueStore = if keep_logged_in {
            &*self.durable
        } else {
            &*self.ephemeral
        };

        let user_json = serde_json::to_string(&credentials.user)?;

        // Written as a unit: token first would be observable alone, so the
        // profile and refresh token go in before the access token flips the
        // tier to "active".
        tier.set(USER_KEY, &user_json)?;
        match &credentials.refresh_token {
            Some(refresh) => tier.set(REFRESH_TOKEN_KEY, refresh)?,
            None => tier.remove(REFRESH_TOKEN_KEY)?,
        }
        tier.set(ACCESS_TOKEN_KEY, &credentials.access_token)?;

        tracing::info!(
            "✅ Session persisted for user {} ({} tier)",
            credentials.user.id,
            if keep_logged_in { "durable" } else { "ephemeral" }
        );
        Ok(())
    }

    /// Resolves which tier currently holds an access token.
    ///
    /// The durable tier is checked first; this preference order is the only
    /// tie-breaker when both tiers hold a token.
    pub fn resolve_active_tier(&self) -> ActiveTier {
        if matches!(self.durable.get(ACCESS_TOKEN_KEY), Ok(Some(_))) {
            return ActiveTier::Durable;
        }
        if matches!(self.ephemeral.get(ACCESS_TOKEN_KEY), Ok(Some(_))) {
            return ActiveTier::Ephemeral;
        }
        ActiveTier::None
    }

    /// Reads the current session from whichever tier holds a token.
    ///
    /// `is_authenticated` is `true` only when the stored token decodes and its
    /// expiry is strictly in the future. A present but invalid or expired
    /// token is never surfaced as an error: both tiers are cleared as a side
    /// effect (lazy eviction) and the read degrades to "not authenticated".
    pub fn current_session(&self) -> CurrentSession {
        let tier: &dyn KeyValueStore = match self.resolve_active_tier() {
            ActiveTier::Durable => &*self.durable,
            ActiveTier::Ephemeral => &*self.ephemeral,
            ActiveTier::None => return CurrentSession::default(),
        };

        let access_token = match tier.get(ACCESS_TOKEN_KEY) {
            Ok(Some(token)) => token,
            _ => return CurrentSession::default(),
        };

        let valid = match token::decode_claims(&access_token) {
            Ok(claims) => !claims.is_expired_at(Utc::now().timestamp()),
            Err(_) => false,
        };

        if !valid {
            tracing::warn!("❌ Stored access token invalid or expired, evicting session");
            self.clear();
            return CurrentSession::default();
        }

        let user: Option<UserProfile> = match tier.get(USER_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).ok(),
            _ => None,
        };

        CurrentSession {
            token: Some(access_token),
            user,
            is_authenticated: true,
        }
    }

    /// Reads the stored refresh token, if any, from the active tier.
    pub fn refresh_token(&self) -> Option<String> {
        let tier: &dyn KeyValueStore = match self.resolve_active_tier() {
            ActiveTier::Durable => &*self.durable,
            ActiveTier::Ephemeral => &*self.ephemeral,
            ActiveTier::None => return None,
        };
        tier.get(REFRESH_TOKEN_KEY).ok().flatten()
    }

    /// Returns a bearer token for a call that requires authentication.
    ///
    /// Unlike `current_session()`, this surfaces the failure as a typed error
    /// so the caller can clear state and route the user back to login.
    pub fn authenticated_token(&self) -> Result<String> {
        match self.resolve_active_tier() {
            ActiveTier::None => {
                return Err(ClientError::Authentication {
                    message: "Not signed in".to_string(),
                    data: None,
                })
            }
            ActiveTier::Durable | ActiveTier::Ephemeral => {}
        }
        let session = self.current_session();
        match session.token {
            Some(token) if session.is_authenticated => Ok(token),
            // A token was present a moment ago but failed validation: the
            // current_session() read above already evicted it.
            _ => Err(ClientError::ExpiredSession),
        }
    }

    /// Removes all session keys from both tiers unconditionally.
    ///
    /// Side effect only; storage failures are logged and swallowed.
    pub fn clear(&self) {
        for (name, tier) in [
            ("durable", &self.durable),
            ("ephemeral", &self.ephemeral),
        ] {
            for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
                if let Err(e) = tier.remove(key) {
                    tracing::warn!("❌ Failed to clear {} from {} tier: {}", key, name, e);
                }
            }
        }
        tracing::debug!("🧹 Session cleared from both tiers");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::token::forge_token;
    use crate::storage::memory::MemoryStore;
    use serde_json::json;
    use uuid::Uuid;

    fn store() -> (SessionStore, Arc<MemoryStore>, Arc<MemoryStore>) {
        let durable = Arc::new(MemoryStore::new());
        let ephemeral = Arc::new(MemoryStore::new());
        (
            SessionStore::new(durable.clone(), ephemeral.clone()),
            durable,
            ephemeral,
        )
    }

    fn profile() -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            email: "jo@example.com".to_string(),
            username: Some("josmith".to_string()),
            first_name: "Jo".to_string(),
            last_name: "Smith".to_string(),
            avatar_url: None,
        }
    }

    fn valid_credentials() -> Credentials {
        let exp = Utc::now().timestamp() + 3600;
        Credentials {
            access_token: forge_token(&json!({ "exp": exp, "user_id": 42 })),
            refresh_token: Some("refresh-token".to_string()),
            user: profile(),
        }
    }

    #[test]
    fn keep_logged_in_selects_the_durable_tier() {
        let (session, durable, ephemeral) = store();
        session.persist(&valid_credentials(), true).unwrap();

        assert_eq!(session.resolve_active_tier(), ActiveTier::Durable);
        assert!(!durable.is_empty());
        assert!(ephemeral.is_empty());
    }

    #[test]
    fn without_keep_logged_in_the_ephemeral_tier_is_used() {
        let (session, durable, ephemeral) = store();
        session.persist(&valid_credentials(), false).unwrap();

        assert_eq!(session.resolve_active_tier(), ActiveTier::Ephemeral);
        assert!(durable.is_empty());
        assert!(!ephemeral.is_empty());
    }

    #[test]
    fn persist_rejects_tokens_without_expiry_or_subject() {
        let (session, durable, ephemeral) = store();

        let no_exp = Credentials {
            access_token: forge_token(&json!({ "user_id": 42 })),
            ..valid_credentials()
        };
        assert!(matches!(
            session.persist(&no_exp, true),
            Err(ClientError::InvalidCredentials(_))
        ));

        let no_subject = Credentials {
            access_token: forge_token(&json!({ "exp": Utc::now().timestamp() + 3600 })),
            ..valid_credentials()
        };
        assert!(matches!(
            session.persist(&no_subject, true),
            Err(ClientError::InvalidCredentials(_))
        ));

        let malformed = Credentials {
            access_token: "garbage".to_string(),
            ..valid_credentials()
        };
        assert!(matches!(
            session.persist(&malformed, false),
            Err(ClientError::InvalidCredentials(_))
        ));

        // Nothing was written by any of the rejected persists.
        assert!(durable.is_empty());
        assert!(ephemeral.is_empty());
    }

    #[test]
    fn current_session_round_trips_the_profile() {
        let (session, _, _) = store();
        let credentials = valid_credentials();
        session.persist(&credentials, true).unwrap();

        let current = session.current_session();
        assert!(current.is_authenticated);
        assert_eq!(current.token.as_deref(), Some(&*credentials.access_token));

        let user = current.user.unwrap();
        assert_eq!(user.id, credentials.user.id);
        assert_eq!(user.email, credentials.user.email);
        assert_eq!(user.first_name, credentials.user.first_name);
        assert_eq!(user.last_name, credentials.user.last_name);
    }

    #[test]
    fn expired_token_is_lazily_evicted_from_both_tiers() {
        let (session, durable, ephemeral) = store();
        let expired = Credentials {
            access_token: forge_token(&json!({
                "exp": Utc::now().timestamp() - 60,
                "user_id": 42
            })),
            ..valid_credentials()
        };
        // persist() only validates claim presence, not freshness; an expired
        // token can legitimately land in storage and must be caught on read.
        session.persist(&expired, true).unwrap();

        let current = session.current_session();
        assert!(!current.is_authenticated);
        assert!(current.token.is_none());
        assert!(durable.is_empty());
        assert!(ephemeral.is_empty());
    }

    #[test]
    fn undecodable_stored_token_degrades_without_error() {
        let (session, durable, _) = store();
        durable.set(ACCESS_TOKEN_KEY, "not-a-jwt").unwrap();

        let current = session.current_session();
        assert!(!current.is_authenticated);
        assert!(durable.is_empty());
    }

    #[test]
    fn durable_tier_wins_when_both_hold_tokens() {
        let (session, _, _) = store();
        session.persist(&valid_credentials(), false).unwrap();
        session.persist(&valid_credentials(), true).unwrap();
        assert_eq!(session.resolve_active_tier(), ActiveTier::Durable);
    }

    #[test]
    fn clear_is_idempotent() {
        let (session, durable, ephemeral) = store();
        session.persist(&valid_credentials(), true).unwrap();

        session.clear();
        assert!(durable.is_empty());
        assert!(ephemeral.is_empty());

        session.clear();
        assert!(durable.is_empty());
        assert!(ephemeral.is_empty());
    }

    #[test]
    fn user_alone_is_not_an_authentication_signal() {
        let (session, durable, _) = store();
        durable
            .set(USER_KEY, &serde_json::to_string(&profile()).unwrap())
            .unwrap();

        let current = session.current_session();
        assert!(!current.is_authenticated);
        assert!(current.token.is_none());
    }

    #[test]
    fn authenticated_token_maps_failures_to_typed_errors() {
        let (session, durable, _) = store();
        assert!(matches!(
            session.authenticated_token(),
            Err(ClientError::Authentication { .. })
        ));

        durable
            .set(
                ACCESS_TOKEN_KEY,
                &forge_token(&json!({
                    "exp": Utc::now().timestamp() - 60,
                    "user_id": 1
                })),
            )
            .unwrap();
        assert!(matches!(
            session.authenticated_token(),
            Err(ClientError::ExpiredSession)
        ));

        session.persist(&valid_credentials(), false).unwrap();
        assert!(session.authenticated_token().is_ok());
    }
}
