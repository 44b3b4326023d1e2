//! Identity token claims.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims payload of an identity token issued by `/login`.
///
/// Binds a verified member identity to its allotment and game so that a
/// later `/start-session` call can skip credential validation and go
/// straight to admission. Carries no session token — capacity is only
/// granted by admission itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject — the member username.
    pub sub: String,
    /// The allotment the member authenticated against.
    pub aid: Uuid,
    /// The game that allotment belongs to.
    pub gid: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token ID.
    pub jti: Uuid,
}
