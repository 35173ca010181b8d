use chrono::Duration;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::auth::interface::{SessionRepository, StoreError};
use crate::modules::auth::model::Session;
use crate::services::client_info::ClientInfo;
use crate::services::clock::Clock;
use crate::services::hashing::token_fingerprint;

pub const LOGOUT_REASON: &str = "User logged out";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session not found")]
    NotFound,

    #[error("Session store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

/// Session lifecycle: `active` until revoked or past `expires_at`.
///
/// Refresh tokens are looked up by fingerprint and are not single-use; the
/// same token keeps working until the session expires or is revoked.
pub struct SessionManager {
    repo: Arc<dyn SessionRepository>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(repo: Arc<dyn SessionRepository>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self { repo, clock, ttl }
    }

    pub async fn create(
        &self,
        user_id: &str,
        client: &ClientInfo,
        refresh_token: &str,
        access_token: &str,
    ) -> Result<Session, SessionError> {
        let now = self.clock.now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            refresh_token_hash: token_fingerprint(refresh_token),
            access_token_hash: Some(token_fingerprint(access_token)),
            device_name: client.device_name.clone(),
            device_type: Some(client.device_type.clone()),
            browser: Some(client.browser.clone()),
            browser_version: Some(client.browser_version.clone()),
            os: Some(client.os.clone()),
            os_version: Some(client.os_version.clone()),
            ip_address: client.ip_address.clone(),
            location: client.location.clone(),
            is_active: true,
            last_accessed_at: now,
            expires_at: now + self.ttl,
            revoked_at: None,
            revoked_reason: None,
            created_at: now,
        };

        self.repo.create(&session).await?;
        Ok(session)
    }

    pub async fn find_by_refresh_token(&self, refresh_token: &str) -> Result<Session, SessionError> {
        let session = self
            .repo
            .find_by_refresh_token_hash(&token_fingerprint(refresh_token))
            .await?;
        self.usable(session)
    }

    /// The session that most recently issued `access_token` to `user_id`.
    pub async fn find_for_access_token(
        &self,
        user_id: &str,
        access_token: &str,
    ) -> Result<Session, SessionError> {
        let session = self
            .repo
            .find_by_access_token_hash(user_id, &token_fingerprint(access_token))
            .await?;
        self.usable(session)
    }

    /// Marks the session as used and records the newly issued access token.
    pub async fn touch(&self, session_id: &str, access_token: &str) -> Result<(), SessionError> {
        self.repo
            .touch(session_id, self.clock.now(), &token_fingerprint(access_token))
            .await?;
        Ok(())
    }

    /// Idempotent: revoking twice re-applies the same fields.
    pub async fn revoke(&self, session_id: &str, reason: &str) -> Result<(), SessionError> {
        self.repo.revoke(session_id, self.clock.now(), reason).await?;
        Ok(())
    }

    fn usable(&self, session: Option<Session>) -> Result<Session, SessionError> {
        let now = self.clock.now();
        session
            .filter(|s| s.is_usable(now))
            .ok_or(SessionError::NotFound)
    }
}
