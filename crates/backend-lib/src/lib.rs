// ============================
// journal-backend/src/lib.rs
// ============================
//! Core library for the journal web server.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod journal;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod storage;
pub mod templates;

use std::sync::Arc;

use crate::auth::{CredentialStore, SessionManager, SqlCredentialStore, TokenSigner};
use crate::config::Settings;
use crate::error::AppError;
use crate::journal::{EntryStore, SqlEntryStore};
use crate::storage::Database;

pub use crate::router::create_router;

/// Application state shared across all handlers.
///
/// Every dependency is constructed here and passed in; nothing is global.
#[derive(Clone)]
pub struct AppState {
    /// Settings the server was started with
    pub settings: Arc<Settings>,
    /// Storage backend
    pub db: Database,
    /// Credential store
    pub credentials: Arc<dyn CredentialStore>,
    /// Session manager
    pub sessions: Arc<SessionManager>,
    /// Entry store
    pub entries: Arc<dyn EntryStore>,
}

impl AppState {
    /// Validate settings, connect to the database and build the stores
    pub async fn new(settings: Settings) -> Result<Self, AppError> {
        settings.validate()?;
        let db = Database::connect(&settings.database_url).await?;
        Self::with_database(settings, db).await
    }

    /// Build the stores on top of an already connected database
    pub async fn with_database(settings: Settings, db: Database) -> Result<Self, AppError> {
        let params = settings.password_hash.to_params()?;
        let credentials = SqlCredentialStore::new(db.clone(), params).await?;
        let signer = TokenSigner::new(&settings.secret_key)?;
        let sessions = SessionManager::new(db.clone(), signer, settings.session_ttl());
        let entries = SqlEntryStore::new(db.clone());

        Ok(Self {
            settings: Arc::new(settings),
            db,
            credentials: Arc::new(credentials),
            sessions: Arc::new(sessions),
            entries: Arc::new(entries),
        })
    }
}
