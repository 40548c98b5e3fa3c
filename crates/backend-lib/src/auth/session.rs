// ============================
// journal-backend/src/auth/session.rs
// ============================
//! Session token handling and management.
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use journal_common::UserId;
use metrics::counter;

use super::token_generator::{generate_secure_token, TokenSigner};
use crate::error::AppError;
use crate::metrics::{SESSION_ENDED, SESSION_EXPIRED, SESSION_STARTED};
use crate::storage::Database;

/// Default session TTL (time to live)
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7); // 7 days

/// Opaque credential replayed by the client: `<session id>.<hmac>`
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Issues, resolves and ends sessions stored in the `sessions` table.
///
/// Holds no mutable state of its own; every call is a database round trip.
#[derive(Clone, Debug)]
pub struct SessionManager {
    db: Database,
    signer: TokenSigner,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(db: Database, signer: TokenSigner, ttl: Duration) -> Self {
        Self { db, signer, ttl }
    }

    /// Start a session bound to `user`
    pub async fn start(&self, user: UserId) -> Result<SessionToken, AppError> {
        self.purge_expired().await?;

        let id = generate_secure_token();
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(self.ttl)
            .map_err(|e| AppError::Config(format!("session TTL out of range: {e}")))?;
        let expires_at = now + ttl;

        sqlx::query(
            "INSERT INTO sessions (id, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&id)
        .bind(user.0)
        .bind(now)
        .bind(expires_at)
        .execute(self.db.pool())
        .await?;

        counter!(SESSION_STARTED).increment(1);
        tracing::info!(user_id = %user, "session started");
        Ok(SessionToken(self.signer.sign(&id)))
    }

    /// Identity bound to a live, untampered token
    pub async fn resolve(&self, token: &SessionToken) -> Result<Option<UserId>, AppError> {
        let Some(id) = self.signer.unsign(token.as_str()) else {
            tracing::debug!("rejected session token with bad signature");
            return Ok(None);
        };

        let row: Option<(i64, DateTime<Utc>)> =
            sqlx::query_as("SELECT user_id, expires_at FROM sessions WHERE id = ?1")
                .bind(id)
                .fetch_optional(self.db.pool())
                .await?;

        match row {
            Some((user_id, expires_at)) if Utc::now() < expires_at => Ok(Some(UserId(user_id))),
            Some(_) => {
                tracing::debug!("session expired");
                Ok(None)
            },
            None => Ok(None),
        }
    }

    /// Invalidate a token. Unknown or tampered tokens are ignored.
    pub async fn end(&self, token: &SessionToken) -> Result<(), AppError> {
        let Some(id) = self.signer.unsign(token.as_str()) else {
            return Ok(());
        };
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?1")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        if result.rows_affected() > 0 {
            counter!(SESSION_ENDED).increment(1);
            tracing::info!("session ended");
        }
        Ok(())
    }

    /// Remove expired rows, returning how many were dropped
    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        let removed = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?1")
            .bind(Utc::now())
            .execute(self.db.pool())
            .await?
            .rows_affected();
        if removed > 0 {
            counter!(SESSION_EXPIRED).increment(removed);
            tracing::debug!(removed, "purged expired sessions");
        }
        Ok(removed)
    }
}
