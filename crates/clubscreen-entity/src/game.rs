//! Game publication state.

use serde::{Deserialize, Serialize};

/// Publication state of a pre-release game.
///
/// Only `Published` games may be viewed. Games are provisioned and
/// transitioned by the external catalog collaborator; this core only
/// reads the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "publication_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PublicationState {
    /// Not yet visible to any club.
    Draft,
    /// Open for preview viewing.
    Published,
    /// Pulled after having been published.
    Withdrawn,
}
