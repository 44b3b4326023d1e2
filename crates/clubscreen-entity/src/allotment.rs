//! Club allotment entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A club's paid grant of a fixed number of simultaneous viewer seats
/// for one pre-release game.
///
/// Allotments are created by the external provisioning collaborator and
/// are read-only to this core. The `active` flag reflects payment and
/// eligibility; capacity is enforced against *fresh* leases only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Allotment {
    /// Unique allotment identifier.
    pub id: Uuid,
    /// The game this allotment grants access to.
    pub game_id: Uuid,
    /// Display name of the owning club.
    pub club_name: String,
    /// Maximum number of simultaneously fresh leases.
    pub capacity: i32,
    /// Whether the allotment is eligible for admissions.
    pub active: bool,
    /// Argon2 hash of the club-wide shared access code, if one was minted.
    pub access_code_hash: Option<String>,
    /// Hard end of the preview window, copied onto every lease at admission.
    pub preview_ends_at: Option<DateTime<Utc>>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// A per-seat username/password pair minted out-of-band for a club's
/// members. Resolves to its allotment during credential validation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AllotmentCredential {
    /// Unique credential identifier.
    pub id: Uuid,
    /// The allotment this credential belongs to.
    pub allotment_id: Uuid,
    /// Globally unique login name.
    pub username: String,
    /// Argon2 hash of the secret.
    pub secret_hash: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}
