// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const USER_REGISTERED: &str = "user.registered";
pub const LOGIN_SUCCEEDED: &str = "login.succeeded";
pub const LOGIN_FAILED: &str = "login.failed";
pub const SESSION_STARTED: &str = "session.started";
pub const SESSION_ENDED: &str = "session.ended";
pub const SESSION_EXPIRED: &str = "session.expired";
pub const SESSION_REJECTED: &str = "session.rejected";
pub const ENTRY_ADDED: &str = "entry.added";
