use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::DbPool;
use crate::modules::auth::interface::{SessionRepository, StoreError, StoreResult, UserRepository};
use crate::modules::auth::model::{Session, User};

pub struct UserCrud {
    pool: DbPool,
}

impl UserCrud {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for UserCrud {
    async fn create(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, password_hash, first_name, last_name, display_name, avatar_url,
                bio, phone, date_of_birth, gender, country, timezone, preferred_language,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.display_name)
        .bind(&user.avatar_url)
        .bind(&user.bio)
        .bind(&user.phone)
        .bind(user.date_of_birth)
        .bind(&user.gender)
        .bind(&user.country)
        .bind(&user.timezone)
        .bind(&user.preferred_language)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StoreError::Duplicate(user.email.clone())
            }
            other => StoreError::Database(other),
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

pub struct SessionCrud {
    pool: DbPool,
}

impl SessionCrud {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for SessionCrud {
    async fn create(&self, session: &Session) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                id, user_id, refresh_token_hash, access_token_hash, device_name, device_type,
                browser, browser_version, os, os_version, ip_address, location, is_active,
                last_accessed_at, expires_at, revoked_at, revoked_reason, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(&session.refresh_token_hash)
        .bind(&session.access_token_hash)
        .bind(&session.device_name)
        .bind(&session.device_type)
        .bind(&session.browser)
        .bind(&session.browser_version)
        .bind(&session.os)
        .bind(&session.os_version)
        .bind(&session.ip_address)
        .bind(&session.location)
        .bind(session.is_active)
        .bind(session.last_accessed_at)
        .bind(session.expires_at)
        .bind(session.revoked_at)
        .bind(&session.revoked_reason)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_refresh_token_hash(&self, token_hash: &str) -> StoreResult<Option<Session>> {
        let session =
            sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE refresh_token_hash = ?")
                .bind(token_hash)
                .fetch_optional(&self.pool)
                .await?;
        Ok(session)
    }

    async fn find_by_access_token_hash(
        &self,
        user_id: &str,
        token_hash: &str,
    ) -> StoreResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT * FROM sessions
            WHERE user_id = ? AND access_token_hash = ?
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn touch(
        &self,
        session_id: &str,
        accessed_at: DateTime<Utc>,
        access_token_hash: &str,
    ) -> StoreResult<()> {
        sqlx::query("UPDATE sessions SET last_accessed_at = ?, access_token_hash = ? WHERE id = ?")
            .bind(accessed_at)
            .bind(access_token_hash)
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn revoke(
        &self,
        session_id: &str,
        revoked_at: DateTime<Utc>,
        reason: &str,
    ) -> StoreResult<()> {
        sqlx::query(
            "UPDATE sessions SET is_active = FALSE, revoked_at = ?, revoked_reason = ? WHERE id = ?",
        )
        .bind(revoked_at)
        .bind(reason)
        .bind(session_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
