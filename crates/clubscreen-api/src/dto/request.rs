//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Member username minted for the club.
    #[validate(length(min = 1, message = "Identifier is required"))]
    pub identifier: String,
    /// Member password.
    #[validate(length(min = 1, message = "Secret is required"))]
    pub secret: String,
}

/// Start-session request body.
///
/// Exactly one entry path applies: a club access code in the body, or
/// `use_existing_login` with an identity token in the Authorization
/// header.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StartSessionRequest {
    /// The game the caller wants to view.
    pub game_ref: Uuid,
    /// Club-wide shared access code.
    #[serde(default)]
    #[validate(length(min = 1, message = "Access code must not be empty"))]
    pub access_code: Option<String>,
    /// Reuse the identity established by `/login`.
    #[serde(default)]
    pub use_existing_login: bool,
}

/// Heartbeat request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HeartbeatRequest {
    /// The opaque session token from `/start-session`.
    #[validate(length(min = 1, message = "Session token is required"))]
    pub session_token: String,
    /// The allotment the session was admitted against.
    pub allotment_ref: Uuid,
}
