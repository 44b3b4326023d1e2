//! Session token minting and digesting.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Number of random bytes behind each session token.
const TOKEN_BYTES: usize = 32;

/// A freshly minted bearer token.
///
/// `secret` is handed to the client exactly once; only `hash` is ever
/// persisted or compared afterwards.
#[derive(Debug, Clone)]
pub struct SessionToken {
    /// The plaintext bearer token (base64url, no padding).
    pub secret: String,
    /// SHA-256 hex digest of the plaintext.
    pub hash: String,
}

/// Mints opaque session tokens.
///
/// Tokens are 32 bytes of CSPRNG output and reveal nothing about the
/// allotment or its capacity by inspection.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionTokenIssuer;

impl SessionTokenIssuer {
    /// Creates a new issuer.
    pub fn new() -> Self {
        Self
    }

    /// Mints a new token bound to nothing until admission stores its hash.
    pub fn mint(&self) -> SessionToken {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);

        let secret = URL_SAFE_NO_PAD.encode(bytes);
        let hash = Self::digest(&secret);

        SessionToken { secret, hash }
    }

    /// Digest of a presented token, for registry lookups.
    pub fn digest(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
