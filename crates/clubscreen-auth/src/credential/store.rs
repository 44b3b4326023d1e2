//! Credential validation — resolves a selector + secret to an allotment.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use clubscreen_core::error::AppError;
use clubscreen_core::result::AppResult;
use clubscreen_entity::{Allotment, PublicationState};

use crate::directory::AllotmentDirectory;

use super::hasher::SecretHasher;

/// Uniform rejection message for every credential failure, so a caller
/// cannot tell whether the selector, the active flag, or the secret was
/// wrong.
pub const AUTH_FAILED_MSG: &str = "Invalid credentials or access code";

/// How the caller identifies the allotment they want a seat from.
#[derive(Debug, Clone, Copy)]
pub enum AllotmentSelector<'a> {
    /// A per-seat username minted for a club member.
    Member { username: &'a str },
    /// The club-wide shared access code for a game.
    AccessCode { game_id: Uuid },
}

/// Validates login pairs and access codes against provisioned allotments.
///
/// Pure read/verify — no side effects. Check order is auth → publication,
/// matching the admission pipeline; only a caller holding a valid secret
/// learns that a game is not yet open.
#[derive(Debug)]
pub struct CredentialStore {
    directory: Arc<dyn AllotmentDirectory>,
    hasher: SecretHasher,
}

impl CredentialStore {
    /// Creates a new credential store.
    pub fn new(directory: Arc<dyn AllotmentDirectory>, hasher: SecretHasher) -> Self {
        Self { directory, hasher }
    }

    /// Resolves the selector and verifies the secret, returning the
    /// allotment on success.
    ///
    /// Resolution failures, inactive allotments, and secret mismatches all
    /// return the same opaque authentication error. A valid secret against
    /// an unpublished game returns the typed `GameNotPublished` rejection.
    pub async fn validate(
        &self,
        selector: AllotmentSelector<'_>,
        secret: &str,
    ) -> AppResult<Allotment> {
        let allotment = match selector {
            AllotmentSelector::Member { username } => {
                self.validate_member(username, secret).await?
            }
            AllotmentSelector::AccessCode { game_id } => {
                self.validate_access_code(game_id, secret).await?
            }
        };

        match self.directory.game_state(allotment.game_id).await? {
            Some(PublicationState::Published) => Ok(allotment),
            Some(_) => Err(AppError::game_not_published(
                "This game is not open for viewing yet",
            )),
            None => {
                debug!(allotment_id = %allotment.id, "Allotment references a missing game");
                Err(AppError::authentication(AUTH_FAILED_MSG))
            }
        }
    }

    async fn validate_member(&self, username: &str, secret: &str) -> AppResult<Allotment> {
        let credential = self
            .directory
            .credential_by_username(username)
            .await?
            .ok_or_else(|| AppError::authentication(AUTH_FAILED_MSG))?;

        if !self.hasher.verify_secret(secret, &credential.secret_hash)? {
            return Err(AppError::authentication(AUTH_FAILED_MSG));
        }

        let allotment = self
            .directory
            .allotment_by_id(credential.allotment_id)
            .await?
            .filter(|a| a.active)
            .ok_or_else(|| AppError::authentication(AUTH_FAILED_MSG))?;

        Ok(allotment)
    }

    async fn validate_access_code(&self, game_id: Uuid, secret: &str) -> AppResult<Allotment> {
        // Codes are salted hashes, so there is no lookup key; verify the
        // presented code against each candidate club's hash for the game.
        let candidates = self.directory.code_bearing_allotments(game_id).await?;

        for allotment in candidates {
            let Some(hash) = allotment.access_code_hash.as_deref() else {
                continue;
            };
            if self.hasher.verify_secret(secret, hash)? {
                return Ok(allotment);
            }
        }

        Err(AppError::authentication(AUTH_FAILED_MSG))
    }
}
