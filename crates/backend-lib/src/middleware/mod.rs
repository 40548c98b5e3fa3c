// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the journal server.

pub mod session;

pub use session::{require_session, CurrentUser, SESSION_COOKIE};
