//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Identity token for the `use_existing_login` admission path.
    pub identity_token: String,
    /// The allotment the member belongs to.
    pub allotment_ref: Uuid,
    /// When the identity token expires.
    pub expires_at: DateTime<Utc>,
}

/// Start-session response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionResponse {
    /// Opaque bearer token tied to the new lease.
    pub session_token: String,
    /// The allotment the seat was granted from.
    pub allotment_ref: Uuid,
    /// How often the client should heartbeat.
    pub heartbeat_interval_seconds: u64,
}

/// Playback authorization response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackResponse {
    /// The allotment backing the session.
    pub allotment_ref: Uuid,
    /// The lease backing the session.
    pub lease_ref: Uuid,
    /// When the lease goes stale absent further heartbeats.
    pub fresh_until: DateTime<Utc>,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}
