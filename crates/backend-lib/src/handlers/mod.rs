// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers, one module per area.

pub mod auth;
pub mod entries;
pub mod health;
