// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::templates;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Username already exists")]
    AlreadyExists,

    /// Unknown user and wrong password are deliberately the same variant
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::AlreadyExists => StatusCode::CONFLICT,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated => StatusCode::SEE_OTHER,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::AlreadyExists => "AUTH_001",
            AppError::InvalidCredentials => "AUTH_002",
            AppError::Unauthenticated => "AUTH_003",
            AppError::Validation(_) => "VAL_001",
            AppError::Database(_) => "DB_001",
            AppError::PasswordHash(_) => "HASH_001",
            AppError::Config(_) => "CFG_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::AlreadyExists => "Username already exists".to_string(),
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Unauthenticated => "Please log in to continue".to_string(),
            _ => "An internal server error occurred".to_string(),
        }
    }

    /// Domain errors are shown to the user; everything else is a server fault
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AppError::AlreadyExists
                | AppError::InvalidCredentials
                | AppError::Validation(_)
                | AppError::Unauthenticated
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Unauthenticated = self {
            return Redirect::to(crate::router::LOGIN_PATH).into_response();
        }

        let status = self.status_code();
        let error_code = self.error_code();
        if !self.is_user_facing() {
            tracing::error!(code = error_code, error = %self, "request failed");
        }

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) && !self.is_user_facing() {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        (status, Html(templates::error_page(status, error_code, &message))).into_response()
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<scrypt::password_hash::Error> for AppError {
    fn from(err: scrypt::password_hash::Error) -> Self {
        AppError::PasswordHash(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("blocking task failed: {err}"))
    }
}
