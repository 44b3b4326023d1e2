//! Postgres-backed allotment directory.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use clubscreen_core::result::AppResult;
use clubscreen_database::repositories::AllotmentRepository;
use clubscreen_entity::{Allotment, AllotmentCredential, PublicationState};

use super::AllotmentDirectory;

/// Directory reading from the shared PostgreSQL store.
#[derive(Debug, Clone)]
pub struct PgAllotmentDirectory {
    repo: Arc<AllotmentRepository>,
}

impl PgAllotmentDirectory {
    /// Creates a new Postgres-backed directory.
    pub fn new(repo: Arc<AllotmentRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl AllotmentDirectory for PgAllotmentDirectory {
    async fn allotment_by_id(&self, id: Uuid) -> AppResult<Option<Allotment>> {
        self.repo.find_by_id(id).await
    }

    async fn credential_by_username(
        &self,
        username: &str,
    ) -> AppResult<Option<AllotmentCredential>> {
        self.repo.find_credential(username).await
    }

    async fn code_bearing_allotments(&self, game_id: Uuid) -> AppResult<Vec<Allotment>> {
        self.repo.find_active_with_code_by_game(game_id).await
    }

    async fn game_state(&self, game_id: Uuid) -> AppResult<Option<PublicationState>> {
        self.repo.game_state(game_id).await
    }
}
