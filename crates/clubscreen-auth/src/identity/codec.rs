//! Identity token signing and verification.

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use clubscreen_core::config::auth::AuthConfig;
use clubscreen_core::error::AppError;

use super::claims::IdentityClaims;

/// Signs and verifies HS256 identity tokens.
#[derive(Clone)]
pub struct IdentityCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_minutes: i64,
}

impl std::fmt::Debug for IdentityCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityCodec")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

impl IdentityCodec {
    /// Creates a codec from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_minutes: config.identity_ttl_minutes as i64,
        }
    }

    /// Issues an identity token for a verified member.
    pub fn issue(
        &self,
        username: &str,
        allotment_id: Uuid,
        game_id: Uuid,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::minutes(self.ttl_minutes);

        let claims = IdentityClaims {
            sub: username.to_string(),
            aid: allotment_id,
            gid: game_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode identity token: {e}")))?;

        Ok((token, expires_at))
    }

    /// Verifies a presented identity token and returns its claims.
    ///
    /// Signature or expiry failures are reported as opaque authentication
    /// errors.
    pub fn verify(&self, token: &str) -> Result<IdentityClaims, AppError> {
        decode::<IdentityClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::authentication("Invalid or expired identity token"))
    }
}
