//! Playback authorization — the freshness check consumed by the
//! video-delivery collaborator before a manifest URL is issued.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use clubscreen_core::config::lease::LeaseConfig;
use clubscreen_core::error::AppError;
use clubscreen_core::result::AppResult;
use clubscreen_entity::PublicationState;

use crate::directory::AllotmentDirectory;
use crate::lease::LeaseRegistry;
use crate::token::SessionTokenIssuer;

/// A positive playback authorization.
#[derive(Debug, Clone)]
pub struct PlaybackAuthorization {
    /// The lease backing the session.
    pub lease_id: Uuid,
    /// The allotment the seat belongs to.
    pub allotment_id: Uuid,
    /// When the lease stops counting absent further heartbeats.
    pub fresh_until: DateTime<Utc>,
}

/// Answers "may this token's session be served right now?".
///
/// Holding a fresh lease is necessary but not sufficient: the owning game
/// must still be published. Heartbeats deliberately skip that check —
/// unpublishing a game mid-session cuts off playback here, not liveness.
pub struct PlaybackGate {
    registry: Arc<dyn LeaseRegistry>,
    directory: Arc<dyn AllotmentDirectory>,
    config: LeaseConfig,
}

impl std::fmt::Debug for PlaybackGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackGate").finish()
    }
}

impl PlaybackGate {
    /// Creates a new playback gate.
    pub fn new(
        registry: Arc<dyn LeaseRegistry>,
        directory: Arc<dyn AllotmentDirectory>,
        config: LeaseConfig,
    ) -> Self {
        Self {
            registry,
            directory,
            config,
        }
    }

    /// Authorizes playback for the session behind `token`.
    pub async fn authorize(&self, token: &str) -> AppResult<PlaybackAuthorization> {
        let token_hash = SessionTokenIssuer::digest(token);

        let lease = self
            .registry
            .find_fresh(&token_hash)
            .await?
            .ok_or_else(|| AppError::not_found("Session not found or expired"))?;

        let allotment = self
            .directory
            .allotment_by_id(lease.allotment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Session not found or expired"))?;

        match self.directory.game_state(allotment.game_id).await? {
            Some(PublicationState::Published) => {}
            _ => {
                debug!(
                    allotment_id = %allotment.id,
                    game_id = %allotment.game_id,
                    "Playback denied, game no longer published"
                );
                return Err(AppError::game_not_published(
                    "This game is not open for viewing",
                ));
            }
        }

        Ok(PlaybackAuthorization {
            lease_id: lease.id,
            allotment_id: lease.allotment_id,
            fresh_until: lease.fresh_until(self.config.heartbeat_ttl()),
        })
    }
}
