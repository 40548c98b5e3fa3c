// ============================
// crates/backend-lib/src/auth/token_generator.rs
// ============================
//! Session identifiers and their HMAC signatures.
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Default token size in bytes (32 bytes = 256 bits of entropy)
const DEFAULT_TOKEN_BYTES: usize = 32;

/// Separator between session id and signature in the client token
const SIGNATURE_SEPARATOR: char = '.';

/// Generate a cryptographically secure random token, base64 URL-safe without padding
pub fn generate_secure_token() -> String {
    generate_secure_token_with_size(DEFAULT_TOKEN_BYTES)
}

/// Generate a random token of `bytes` bytes of entropy
fn generate_secure_token_with_size(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}

/// Signs and checks session ids with the configured secret key
#[derive(Clone)]
pub struct TokenSigner {
    mac: HmacSha256,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

impl TokenSigner {
    pub fn new(secret_key: &str) -> Result<Self, AppError> {
        let mac = HmacSha256::new_from_slice(secret_key.as_bytes())
            .map_err(|e| AppError::Config(format!("unusable secret key: {e}")))?;
        Ok(Self { mac })
    }

    /// `<id>.<signature>`
    pub fn sign(&self, id: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        format!("{id}{SIGNATURE_SEPARATOR}{signature}")
    }

    /// Return the session id if the signature matches, in constant time
    pub fn unsign<'a>(&self, token: &'a str) -> Option<&'a str> {
        let (id, signature) = token.rsplit_once(SIGNATURE_SEPARATOR)?;
        if id.is_empty() {
            return None;
        }
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;
        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        mac.verify_slice(&signature).ok()?;
        Some(id)
    }
}
