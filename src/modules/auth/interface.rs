use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Session, User};

// =============================================================================
// REPOSITORY TRAITS
// =============================================================================

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with [`StoreError::Duplicate`] when the email is taken.
    async fn create(&self, user: &User) -> StoreResult<()>;
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> StoreResult<()>;
    async fn find_by_refresh_token_hash(&self, token_hash: &str) -> StoreResult<Option<Session>>;
    /// Most recent session of `user_id` whose last issued access token matches.
    async fn find_by_access_token_hash(
        &self,
        user_id: &str,
        token_hash: &str,
    ) -> StoreResult<Option<Session>>;
    async fn touch(
        &self,
        session_id: &str,
        accessed_at: DateTime<Utc>,
        access_token_hash: &str,
    ) -> StoreResult<()>;
    async fn revoke(
        &self,
        session_id: &str,
        revoked_at: DateTime<Utc>,
        reason: &str,
    ) -> StoreResult<()>;
}

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
