//! Read-only view over externally provisioned allotments, credentials,
//! and games.
//!
//! Behind a trait so the HTTP layer and services can run against either
//! the Postgres-backed directory or an in-memory one (tests, demos).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use clubscreen_core::result::AppResult;
use clubscreen_entity::{Allotment, AllotmentCredential, PublicationState};

pub use memory::MemoryAllotmentDirectory;
pub use postgres::PgAllotmentDirectory;

/// Read-only resolution of allotments, member credentials, and game
/// publication state.
#[async_trait]
pub trait AllotmentDirectory: Send + Sync + std::fmt::Debug {
    /// Find an allotment by ID.
    async fn allotment_by_id(&self, id: Uuid) -> AppResult<Option<Allotment>>;

    /// Find a per-seat member credential by its globally unique username.
    async fn credential_by_username(
        &self,
        username: &str,
    ) -> AppResult<Option<AllotmentCredential>>;

    /// List the active allotments for a game that carry an access code.
    async fn code_bearing_allotments(&self, game_id: Uuid) -> AppResult<Vec<Allotment>>;

    /// Read the publication state of a game.
    async fn game_state(&self, game_id: Uuid) -> AppResult<Option<PublicationState>>;
}
