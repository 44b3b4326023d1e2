//! Session admission — the capacity-guarded entry point for viewing.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use clubscreen_core::error::AppError;
use clubscreen_core::result::AppResult;
use clubscreen_entity::{Allotment, PublicationState};

use crate::credential::store::AUTH_FAILED_MSG;
use crate::credential::{AllotmentSelector, CredentialStore};
use crate::directory::AllotmentDirectory;
use crate::identity::IdentityCodec;
use crate::lease::{AdmitOutcome, LeaseRegistry};
use crate::token::SessionTokenIssuer;

/// Client-facing message for a full allotment.
const CAPACITY_MSG: &str = "This club's viewer limit has been reached, try again later";

/// A successful admission: the lease and its one-time plaintext token.
#[derive(Debug, Clone)]
pub struct AdmissionGrant {
    /// The created lease's ID.
    pub lease_id: Uuid,
    /// The allotment the seat was granted from.
    pub allotment_id: Uuid,
    /// The opaque bearer token. Returned to the client exactly once.
    pub token: String,
}

/// Decides whether a new viewing session may start.
///
/// Two entry paths — fresh credentials and a previously issued identity
/// token — funnel into the same capacity-guarded [`admit`](Self::admit)
/// so the invariant logic exists exactly once. The registry performs the
/// count-and-insert atomically; this service never reads occupancy
/// separately from the insert it guards.
pub struct SessionAdmission {
    credentials: Arc<CredentialStore>,
    directory: Arc<dyn AllotmentDirectory>,
    identity: Arc<IdentityCodec>,
    registry: Arc<dyn LeaseRegistry>,
    issuer: SessionTokenIssuer,
}

impl std::fmt::Debug for SessionAdmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAdmission").finish()
    }
}

impl SessionAdmission {
    /// Creates a new admission service.
    pub fn new(
        credentials: Arc<CredentialStore>,
        directory: Arc<dyn AllotmentDirectory>,
        identity: Arc<IdentityCodec>,
        registry: Arc<dyn LeaseRegistry>,
        issuer: SessionTokenIssuer,
    ) -> Self {
        Self {
            credentials,
            directory,
            identity,
            registry,
            issuer,
        }
    }

    /// Admission via credential validation (access code or member login).
    ///
    /// `game_id` is the game the caller asked to view; a credential that
    /// resolves to a different game's allotment is rejected opaquely.
    pub async fn admit_with_secret(
        &self,
        selector: AllotmentSelector<'_>,
        secret: &str,
        game_id: Uuid,
    ) -> AppResult<AdmissionGrant> {
        let allotment = self.credentials.validate(selector, secret).await?;

        if allotment.game_id != game_id {
            return Err(AppError::authentication(AUTH_FAILED_MSG));
        }

        self.admit(&allotment).await
    }

    /// Admission via a previously issued identity token.
    ///
    /// The token proves the credential check already happened; the
    /// allotment's eligibility and the game's publication state are still
    /// re-checked here, in the same auth → publication → capacity order.
    pub async fn admit_with_identity(
        &self,
        identity_token: &str,
        game_id: Uuid,
    ) -> AppResult<AdmissionGrant> {
        let claims = self.identity.verify(identity_token)?;

        if claims.gid != game_id {
            return Err(AppError::authentication(AUTH_FAILED_MSG));
        }

        let allotment = self
            .directory
            .allotment_by_id(claims.aid)
            .await?
            .filter(|a| a.active)
            .ok_or_else(|| AppError::authentication(AUTH_FAILED_MSG))?;

        match self.directory.game_state(allotment.game_id).await? {
            Some(PublicationState::Published) => {}
            Some(_) => {
                return Err(AppError::game_not_published(
                    "This game is not open for viewing yet",
                ));
            }
            None => return Err(AppError::authentication(AUTH_FAILED_MSG)),
        }

        self.admit(&allotment).await
    }

    /// The single capacity-guarded admission step.
    async fn admit(&self, allotment: &Allotment) -> AppResult<AdmissionGrant> {
        let token = self.issuer.mint();

        match self.registry.admit(allotment, &token.hash).await? {
            AdmitOutcome::Admitted(lease) => {
                info!(
                    allotment_id = %allotment.id,
                    lease_id = %lease.id,
                    "Viewer admitted"
                );
                Ok(AdmissionGrant {
                    lease_id: lease.id,
                    allotment_id: allotment.id,
                    token: token.secret,
                })
            }
            AdmitOutcome::CapacityExceeded => {
                warn!(
                    allotment_id = %allotment.id,
                    capacity = allotment.capacity,
                    "Admission denied, allotment full"
                );
                Err(AppError::capacity_exceeded(CAPACITY_MSG))
            }
        }
    }
}
