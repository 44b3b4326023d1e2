//! Postgres-backed lease registry — the authoritative implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use clubscreen_core::config::lease::LeaseConfig;
use clubscreen_core::result::AppResult;
use clubscreen_database::repositories::LeaseRepository;
use clubscreen_entity::{Allotment, Lease};

use super::{AdmitOutcome, LeaseRegistry};

/// Registry backed by the shared PostgreSQL store.
///
/// Admission atomicity comes from the repository's row-lock transaction,
/// so any number of service instances can admit concurrently without
/// over-granting: the serialization point lives in the database, never in
/// process memory.
#[derive(Debug, Clone)]
pub struct PgLeaseRegistry {
    repo: Arc<LeaseRepository>,
    config: LeaseConfig,
}

impl PgLeaseRegistry {
    /// Creates a new Postgres-backed registry.
    pub fn new(repo: Arc<LeaseRepository>, config: LeaseConfig) -> Self {
        Self { repo, config }
    }

    fn fresh_cutoff(&self) -> DateTime<Utc> {
        Utc::now() - self.config.heartbeat_ttl()
    }
}

#[async_trait]
impl LeaseRegistry for PgLeaseRegistry {
    async fn admit(&self, allotment: &Allotment, token_hash: &str) -> AppResult<AdmitOutcome> {
        let inserted = self
            .repo
            .insert_if_capacity(
                allotment.id,
                token_hash,
                self.fresh_cutoff(),
                allotment.preview_ends_at,
            )
            .await?;

        Ok(match inserted {
            Some(lease) => AdmitOutcome::Admitted(lease),
            None => AdmitOutcome::CapacityExceeded,
        })
    }

    async fn refresh(&self, token_hash: &str, allotment_id: Uuid) -> AppResult<bool> {
        self.repo
            .refresh_if_fresh(token_hash, allotment_id, self.fresh_cutoff())
            .await
    }

    async fn find_fresh(&self, token_hash: &str) -> AppResult<Option<Lease>> {
        self.repo
            .find_fresh_by_token_hash(token_hash, self.fresh_cutoff())
            .await
    }

    async fn count_fresh(&self, allotment_id: Uuid) -> AppResult<u32> {
        let count = self
            .repo
            .count_fresh(allotment_id, self.fresh_cutoff())
            .await?;
        Ok(count.max(0) as u32)
    }

    async fn purge_stale(&self, older_than: DateTime<Utc>) -> AppResult<u64> {
        self.repo.delete_stale_before(older_than).await
    }
}
