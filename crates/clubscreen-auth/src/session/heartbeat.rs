//! Heartbeat handling — keeps admitted leases fresh.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use clubscreen_core::error::AppError;
use clubscreen_core::result::AppResult;

use crate::lease::LeaseRegistry;
use crate::token::SessionTokenIssuer;

/// Accepts liveness pings from viewing clients.
///
/// A heartbeat only ever extends an existing grant: it never creates
/// capacity, never fails because the allotment is full, and never
/// resurrects a lease that has already gone stale. When the client stops
/// calling, the lease simply ages out on its own.
pub struct HeartbeatService {
    registry: Arc<dyn LeaseRegistry>,
}

impl std::fmt::Debug for HeartbeatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeartbeatService").finish()
    }
}

impl HeartbeatService {
    /// Creates a new heartbeat service.
    pub fn new(registry: Arc<dyn LeaseRegistry>) -> Self {
        Self { registry }
    }

    /// Refreshes the lease behind `token`, scoped to `allotment_id` so a
    /// token cannot be replayed against another club's allotment.
    pub async fn heartbeat(&self, token: &str, allotment_id: Uuid) -> AppResult<()> {
        let token_hash = SessionTokenIssuer::digest(token);

        if self.registry.refresh(&token_hash, allotment_id).await? {
            Ok(())
        } else {
            debug!(allotment_id = %allotment_id, "Heartbeat for unknown or stale lease");
            Err(AppError::not_found("Session not found or expired"))
        }
    }
}
