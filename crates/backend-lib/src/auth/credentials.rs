// ============================
// journal-backend/src/auth/credentials.rs
// ============================
//! Username → password-hash store.
use async_trait::async_trait;
use journal_common::{UserId, MAX_USERNAME_LEN};
use metrics::counter;
use scrypt::Params;
use zeroize::Zeroize;

use super::password::{hash_password, hash_password_secure, verify_password};
use crate::error::AppError;
use crate::metrics::{LOGIN_FAILED, LOGIN_SUCCEEDED, USER_REGISTERED};
use crate::storage::Database;

/// Registration and credential checks
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Create a user. Fails with [`AppError::AlreadyExists`] when the name is taken.
    async fn register(&self, username: &str, password: &str) -> Result<UserId, AppError>;

    /// Identity for a matching username/password pair.
    ///
    /// Unknown user and wrong password both give `Ok(None)`.
    async fn verify(&self, username: &str, password: &str) -> Result<Option<UserId>, AppError>;

    /// Display name for an identity
    async fn username(&self, user: UserId) -> Result<Option<String>, AppError>;
}

/// Check the registration form before any hashing or database work
pub fn validate_registration(username: &str, password: &str) -> Result<(), AppError> {
    if username.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".to_string(),
        ));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::Validation(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    Ok(())
}

/// sqlx-backed credential store
#[derive(Clone)]
pub struct SqlCredentialStore {
    db: Database,
    params: Params,
    /// Verified against when the username is unknown, so both failure paths cost one scrypt run
    dummy_hash: String,
}

impl SqlCredentialStore {
    pub async fn new(db: Database, params: Params) -> Result<Self, AppError> {
        let dummy_hash = tokio::task::spawn_blocking(move || {
            hash_password(&super::generate_secure_token(), params)
        })
        .await??;
        Ok(Self {
            db,
            params,
            dummy_hash,
        })
    }

    async fn find_user(&self, username: &str) -> Result<Option<(i64, String)>, AppError> {
        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT id, password_hash FROM users WHERE username = ?1")
                .bind(username)
                .fetch_optional(self.db.pool())
                .await?;
        Ok(row)
    }
}

#[async_trait]
impl CredentialStore for SqlCredentialStore {
    async fn register(&self, username: &str, password: &str) -> Result<UserId, AppError> {
        validate_registration(username, password)?;

        // check-then-insert; the UNIQUE constraint covers the race between the two
        if self.find_user(username).await?.is_some() {
            return Err(AppError::AlreadyExists);
        }

        let params = self.params;
        let mut plain = password.to_string();
        let password_hash =
            tokio::task::spawn_blocking(move || hash_password_secure(&mut plain, params)).await??;

        let inserted: Result<(i64,), sqlx::Error> =
            sqlx::query_as("INSERT INTO users (username, password_hash) VALUES (?1, ?2) RETURNING id")
                .bind(username)
                .bind(&password_hash)
                .fetch_one(self.db.pool())
                .await;

        match inserted {
            Ok((id,)) => {
                counter!(USER_REGISTERED).increment(1);
                tracing::info!(user_id = id, username, "user registered");
                Ok(UserId(id))
            },
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::AlreadyExists),
            Err(e) => Err(e.into()),
        }
    }

    async fn verify(&self, username: &str, password: &str) -> Result<Option<UserId>, AppError> {
        let user = self.find_user(username).await?;
        let (id, stored_hash) = match user {
            Some((id, hash)) => (Some(id), hash),
            None => (None, self.dummy_hash.clone()),
        };

        let mut plain = password.to_string();
        let matches = tokio::task::spawn_blocking(move || {
            let ok = verify_password(&stored_hash, &plain);
            plain.zeroize();
            ok
        })
        .await?;

        match id {
            Some(id) if matches => {
                counter!(LOGIN_SUCCEEDED).increment(1);
                tracing::info!(user_id = id, "credentials verified");
                Ok(Some(UserId(id)))
            },
            _ => {
                counter!(LOGIN_FAILED).increment(1);
                tracing::warn!("credential check failed");
                Ok(None)
            },
        }
    }

    async fn username(&self, user: UserId) -> Result<Option<String>, AppError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT username FROM users WHERE id = ?1")
            .bind(user.0)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.map(|(name,)| name))
    }
}
