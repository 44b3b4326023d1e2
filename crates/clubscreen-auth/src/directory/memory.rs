//! In-memory allotment directory for tests and single-node demos.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use clubscreen_core::result::AppResult;
use clubscreen_entity::{Allotment, AllotmentCredential, PublicationState};

use super::AllotmentDirectory;

/// Directory holding provisioned records in process memory.
///
/// Read paths mirror [`PgAllotmentDirectory`]; the insert methods stand in
/// for the external provisioning collaborator.
#[derive(Debug, Default)]
pub struct MemoryAllotmentDirectory {
    games: DashMap<Uuid, PublicationState>,
    allotments: DashMap<Uuid, Allotment>,
    credentials: DashMap<String, AllotmentCredential>,
}

impl MemoryAllotmentDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a game with the given publication state.
    pub fn insert_game(&self, game_id: Uuid, state: PublicationState) {
        self.games.insert(game_id, state);
    }

    /// Update a game's publication state (e.g. withdrawing mid-preview).
    pub fn set_game_state(&self, game_id: Uuid, state: PublicationState) {
        self.games.insert(game_id, state);
    }

    /// Provision an allotment.
    pub fn insert_allotment(&self, allotment: Allotment) {
        self.allotments.insert(allotment.id, allotment);
    }

    /// Provision a per-seat member credential.
    pub fn insert_credential(&self, credential: AllotmentCredential) {
        self.credentials
            .insert(credential.username.clone(), credential);
    }
}

#[async_trait]
impl AllotmentDirectory for MemoryAllotmentDirectory {
    async fn allotment_by_id(&self, id: Uuid) -> AppResult<Option<Allotment>> {
        Ok(self.allotments.get(&id).map(|entry| entry.value().clone()))
    }

    async fn credential_by_username(
        &self,
        username: &str,
    ) -> AppResult<Option<AllotmentCredential>> {
        Ok(self
            .credentials
            .get(username)
            .map(|entry| entry.value().clone()))
    }

    async fn code_bearing_allotments(&self, game_id: Uuid) -> AppResult<Vec<Allotment>> {
        let mut matches: Vec<Allotment> = self
            .allotments
            .iter()
            .filter(|entry| {
                let a = entry.value();
                a.game_id == game_id && a.active && a.access_code_hash.is_some()
            })
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by_key(|a| a.created_at);
        Ok(matches)
    }

    async fn game_state(&self, game_id: Uuid) -> AppResult<Option<PublicationState>> {
        Ok(self.games.get(&game_id).map(|entry| *entry.value()))
    }
}
