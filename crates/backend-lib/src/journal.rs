// ============================
// journal-backend/src/journal.rs
// ============================
//! Per-user journal entries.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use journal_common::{Entry, EntryId, UserId};
use metrics::counter;

use crate::error::AppError;
use crate::metrics::ENTRY_ADDED;
use crate::storage::Database;

/// Trait for entry storage backends
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Entries owned by `user`, newest first
    async fn list_for(&self, user: UserId) -> Result<Vec<Entry>, AppError>;

    /// Store a new entry stamped with the server clock
    async fn add(&self, user: UserId, content: &str) -> Result<Entry, AppError>;
}

/// Reject empty or whitespace-only content
pub fn validate_content(content: &str) -> Result<(), AppError> {
    if content.trim().is_empty() {
        return Err(AppError::Validation(
            "Entry content cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: i64,
    user_id: i64,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<EntryRow> for Entry {
    fn from(row: EntryRow) -> Self {
        Entry {
            id: EntryId(row.id),
            user_id: UserId(row.user_id),
            content: row.content,
            created_at: row.created_at,
        }
    }
}

/// sqlx-backed entry store
#[derive(Clone)]
pub struct SqlEntryStore {
    db: Database,
}

impl SqlEntryStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntryStore for SqlEntryStore {
    async fn list_for(&self, user: UserId) -> Result<Vec<Entry>, AppError> {
        let rows: Vec<EntryRow> = sqlx::query_as(
            "SELECT id, user_id, content, created_at FROM entries
             WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user.0)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(Entry::from).collect())
    }

    async fn add(&self, user: UserId, content: &str) -> Result<Entry, AppError> {
        validate_content(content)?;

        let row: EntryRow = sqlx::query_as(
            "INSERT INTO entries (user_id, content, created_at) VALUES (?1, ?2, ?3)
             RETURNING id, user_id, content, created_at",
        )
        .bind(user.0)
        .bind(content)
        .bind(Utc::now())
        .fetch_one(self.db.pool())
        .await?;

        counter!(ENTRY_ADDED).increment(1);
        tracing::info!(user_id = %user, entry_id = row.id, "entry added");
        Ok(row.into())
    }
}
