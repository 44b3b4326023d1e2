//! Periodic purge of long-stale lease rows.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use clubscreen_core::config::lease::LeaseConfig;
use clubscreen_core::result::AppResult;

use crate::lease::LeaseRegistry;

/// Hard-deletes leases that have been stale for a multiple of the
/// freshness window, bounding storage growth.
///
/// The capacity invariant never depends on this: stale leases already
/// stopped counting the moment their window lapsed.
pub struct LeaseReaper {
    registry: Arc<dyn LeaseRegistry>,
    config: LeaseConfig,
}

impl std::fmt::Debug for LeaseReaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaseReaper").finish()
    }
}

impl LeaseReaper {
    /// Creates a new reaper.
    pub fn new(registry: Arc<dyn LeaseRegistry>, config: LeaseConfig) -> Self {
        Self { registry, config }
    }

    /// Runs one sweep; returns the number of rows purged.
    pub async fn run_sweep(&self) -> AppResult<u64> {
        let cutoff = Utc::now() - self.config.reap_age();
        let purged = self.registry.purge_stale(cutoff).await?;

        if purged > 0 {
            info!(purged, "Purged long-stale leases");
        }

        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use clubscreen_entity::Allotment;
    use uuid::Uuid;

    use crate::lease::MemoryLeaseRegistry;

    #[tokio::test]
    async fn sweep_only_removes_leases_past_twice_the_ttl() {
        let config = LeaseConfig {
            heartbeat_ttl_seconds: 90,
            heartbeat_interval_seconds: 45,
            reaper: Default::default(),
        };
        let registry = Arc::new(MemoryLeaseRegistry::new(&config));
        let allotment = Allotment {
            id: Uuid::new_v4(),
            game_id: Uuid::new_v4(),
            club_name: "SC Aufräumen".to_string(),
            capacity: 3,
            active: true,
            access_code_hash: None,
            preview_ends_at: None,
            created_at: Utc::now(),
        };

        registry.admit(&allotment, "fresh").await.unwrap();
        registry.admit(&allotment, "stale").await.unwrap();
        registry.admit(&allotment, "forgotten").await.unwrap();
        registry
            .backdate_heartbeat("stale", Duration::seconds(120))
            .await;
        registry
            .backdate_heartbeat("forgotten", Duration::seconds(300))
            .await;

        let reaper = LeaseReaper::new(
            Arc::clone(&registry) as Arc<dyn LeaseRegistry>,
            config,
        );
        let purged = reaper.run_sweep().await.unwrap();

        // 2 × 90 s cutoff: only the 300 s lease goes.
        assert_eq!(purged, 1);
        assert!(registry.find_fresh("fresh").await.unwrap().is_some());
        assert!(registry.find_fresh("forgotten").await.unwrap().is_none());
    }
}
