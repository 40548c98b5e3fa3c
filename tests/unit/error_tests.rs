// =========================
// tests/unit/error_tests.rs
// =========================
//! Unit tests for the error module
use axum::http::StatusCode;
use axum::response::IntoResponse;
use journal_backend::error::AppError;

#[test]
fn test_domain_errors_are_user_facing() {
    for err in [
        AppError::AlreadyExists,
        AppError::InvalidCredentials,
        AppError::Validation("Entry content cannot be empty".into()),
        AppError::Unauthenticated,
    ] {
        assert!(err.is_user_facing(), "{err}");
    }
    assert!(!AppError::Internal("boom".into()).is_user_facing());
    assert!(!AppError::Config("bad".into()).is_user_facing());
}

#[test]
fn test_app_error_error_codes() {
    assert_eq!(AppError::AlreadyExists.error_code(), "AUTH_001");
    assert_eq!(AppError::InvalidCredentials.error_code(), "AUTH_002");
    assert_eq!(AppError::Unauthenticated.error_code(), "AUTH_003");
    assert_eq!(AppError::Validation("x".into()).error_code(), "VAL_001");
    assert_eq!(AppError::Internal("x".into()).error_code(), "INT_001");
}

#[test]
fn test_invalid_credentials_message_does_not_leak_cause() {
    let message = AppError::InvalidCredentials.sanitized_message();
    assert_eq!(message, "Invalid credentials");
    assert!(!message.to_lowercase().contains("user"));
    assert!(!message.to_lowercase().contains("password"));
}

#[test]
fn test_internal_error_response() {
    let response = AppError::Internal("secret detail".into()).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
