// ============================
// journal-backend/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod credentials;
pub mod password;
pub mod session;
pub mod token_generator;

pub use credentials::{validate_registration, CredentialStore, SqlCredentialStore};
pub use password::{hash_password, hash_password_secure, verify_password};
pub use session::{SessionManager, SessionToken, SESSION_TTL};
pub use token_generator::{generate_secure_token, TokenSigner};
