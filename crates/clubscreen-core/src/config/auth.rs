//! Identity token configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the identity token issued by `/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for identity token signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Identity token TTL in minutes.
    #[serde(default = "default_identity_ttl")]
    pub identity_ttl_minutes: u64,
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_identity_ttl() -> u64 {
    30
}
