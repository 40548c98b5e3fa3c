// ============================
// journal-backend/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::SESSION_TTL;
use crate::error::AppError;

/// Development secret. Rejected outside debug mode.
pub const DEV_SECRET_KEY: &str = "devkey";

/// Shortest secret key accepted when `debug` is off
pub const MIN_SECRET_KEY_LEN: usize = 32;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// sqlx connection string
    pub database_url: String,
    /// HMAC key for session cookies
    pub secret_key: String,
    /// Development mode: readable logs, detailed error pages
    pub debug: bool,
    /// Mark the session cookie `Secure`
    pub cookie_secure: bool,
    /// Log level
    pub log_level: String,
    /// Session TTL in seconds
    pub session_ttl_secs: u64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// scrypt cost for new password hashes
    pub password_hash: PasswordHashSettings,
}

/// scrypt cost parameters.
///
/// Only new hashes use these; verification reads the parameters stored in the hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordHashSettings {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            database_url: "sqlite://journal.db?mode=rwc".to_string(),
            secret_key: DEV_SECRET_KEY.to_string(),
            debug: false,
            cookie_secure: true,
            log_level: "info".to_string(),
            session_ttl_secs: SESSION_TTL.as_secs(),
            request_timeout_secs: 30,
            password_hash: PasswordHashSettings::default(),
        }
    }
}

impl Default for PasswordHashSettings {
    fn default() -> Self {
        Self {
            log_n: scrypt::Params::RECOMMENDED_LOG_N,
            r: scrypt::Params::RECOMMENDED_R,
            p: scrypt::Params::RECOMMENDED_P,
        }
    }
}

impl PasswordHashSettings {
    /// Convert to scrypt parameters, rejecting combinations scrypt refuses
    pub fn to_params(self) -> Result<scrypt::Params, AppError> {
        scrypt::Params::new(self.log_n, self.r, self.p, scrypt::Params::RECOMMENDED_LEN)
            .map_err(|e| AppError::Config(format!("invalid scrypt parameters: {e}")))
    }
}

impl Settings {
    /// Debug profile: insecure cookie, development secret
    pub fn development() -> Self {
        Self {
            debug: true,
            cookie_secure: false,
            log_level: "debug".to_string(),
            ..Self::default()
        }
    }

    /// Load from `config.toml` and the environment
    pub fn load() -> Result<Self, AppError> {
        Self::figment(None).extract().map_err(AppError::from)
    }

    /// Load with an extra TOML file layered above `config.toml`
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        Self::figment(Some(path.as_ref()))
            .extract()
            .map_err(AppError::from)
    }

    /// Provider chain; later sources win.
    ///
    /// `DATABASE_URL` and `SECRET_KEY` are honoured without prefix so existing
    /// deployments keep working.
    pub fn figment(extra: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"));
        if let Some(path) = extra {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed("JOURNAL_").split("__"))
            .merge(Env::raw().only(&["database_url", "secret_key"]))
    }

    /// Reject settings the server cannot run safely with
    pub fn validate(&self) -> Result<(), AppError> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(AppError::Config(format!(
                "unknown log level `{}`",
                self.log_level
            )));
        }
        if self.session_ttl_secs == 0 {
            return Err(AppError::Config("session_ttl_secs must be positive".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "request_timeout_secs must be positive".into(),
            ));
        }
        if self.database_url.trim().is_empty() {
            return Err(AppError::Config("database_url is empty".into()));
        }
        self.password_hash.to_params()?;
        if !self.debug && self.secret_key.len() < MIN_SECRET_KEY_LEN {
            return Err(AppError::Config(format!(
                "secret_key must be at least {MIN_SECRET_KEY_LEN} bytes outside debug mode"
            )));
        }
        if self.secret_key.is_empty() {
            return Err(AppError::Config("secret_key is empty".into()));
        }
        Ok(())
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
