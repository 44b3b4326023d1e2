//! Read-only allotment and game queries.
//!
//! Allotments, credentials, and games are provisioned by an external
//! collaborator; this repository only resolves them during credential
//! validation and playback authorization.

use sqlx::PgPool;
use uuid::Uuid;

use clubscreen_core::error::{AppError, ErrorKind};
use clubscreen_core::result::AppResult;
use clubscreen_entity::{Allotment, AllotmentCredential, PublicationState};

/// Repository for allotment, credential, and game lookups.
#[derive(Debug, Clone)]
pub struct AllotmentRepository {
    pool: PgPool,
}

impl AllotmentRepository {
    /// Create a new allotment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an allotment by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Allotment>> {
        sqlx::query_as::<_, Allotment>("SELECT * FROM allotments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find allotment", e))
    }

    /// Find a per-seat member credential by its globally unique username.
    pub async fn find_credential(&self, username: &str) -> AppResult<Option<AllotmentCredential>> {
        sqlx::query_as::<_, AllotmentCredential>(
            "SELECT * FROM allotment_credentials WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find credential", e))
    }

    /// List the active allotments for a game that carry an access code.
    ///
    /// Used to resolve a presented access code: the code is verified against
    /// each candidate's stored hash.
    pub async fn find_active_with_code_by_game(&self, game_id: Uuid) -> AppResult<Vec<Allotment>> {
        sqlx::query_as::<_, Allotment>(
            "SELECT * FROM allotments \
             WHERE game_id = $1 AND active = TRUE AND access_code_hash IS NOT NULL \
             ORDER BY created_at ASC",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list game allotments", e)
        })
    }

    /// Read the publication state of a game.
    pub async fn game_state(&self, game_id: Uuid) -> AppResult<Option<PublicationState>> {
        sqlx::query_scalar::<_, PublicationState>("SELECT state FROM games WHERE id = $1")
            .bind(game_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read game state", e))
    }
}
