//! Liveness check.

/// GET /ping
pub async fn ping() -> &'static str {
    "pong"
}
