//! In-memory lease registry for single-node deployments and tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use clubscreen_core::config::lease::LeaseConfig;
use clubscreen_core::result::AppResult;
use clubscreen_entity::{Allotment, Lease};

use super::{AdmitOutcome, LeaseRegistry};

/// Leases of a single allotment, guarded by that allotment's own mutex.
#[derive(Debug, Default)]
struct Slot {
    leases: Vec<Lease>,
}

/// Registry holding leases in process memory.
///
/// Suitable for single-node deployments only: with more than one service
/// instance, per-process occupancy diverges from reality and the capacity
/// invariant cannot be enforced. Each allotment gets its own mutex so
/// admissions for different allotments never contend.
#[derive(Debug)]
pub struct MemoryLeaseRegistry {
    ttl: Duration,
    slots: DashMap<Uuid, Arc<Mutex<Slot>>>,
    /// token digest → allotment, for lookups that only hold a token.
    token_index: DashMap<String, Uuid>,
}

impl MemoryLeaseRegistry {
    /// Creates an empty registry with the configured freshness window.
    pub fn new(config: &LeaseConfig) -> Self {
        Self {
            ttl: config.heartbeat_ttl(),
            slots: DashMap::new(),
            token_index: DashMap::new(),
        }
    }

    fn slot(&self, allotment_id: Uuid) -> Arc<Mutex<Slot>> {
        // Clone out of the map entry so no shard guard is held across await.
        let entry = self
            .slots
            .entry(allotment_id)
            .or_insert_with(|| Arc::new(Mutex::new(Slot::default())));
        Arc::clone(entry.value())
    }

    /// Rewind a lease's heartbeat, as if the client had gone quiet.
    /// Test hook; production staleness only ever comes from elapsed time.
    #[doc(hidden)]
    pub async fn backdate_heartbeat(&self, token_hash: &str, by: Duration) {
        if let Some(allotment_id) = self.token_index.get(token_hash).map(|e| *e) {
            let slot = self.slot(allotment_id);
            let mut slot = slot.lock().await;
            if let Some(lease) = slot.leases.iter_mut().find(|l| l.token_hash == token_hash) {
                lease.last_heartbeat_at -= by;
            }
        }
    }
}

#[async_trait]
impl LeaseRegistry for MemoryLeaseRegistry {
    async fn admit(&self, allotment: &Allotment, token_hash: &str) -> AppResult<AdmitOutcome> {
        let slot = self.slot(allotment.id);
        let mut slot = slot.lock().await;

        let now = Utc::now();
        let occupied = slot
            .leases
            .iter()
            .filter(|l| l.is_fresh(self.ttl, now))
            .count();

        if occupied >= allotment.capacity.max(0) as usize {
            return Ok(AdmitOutcome::CapacityExceeded);
        }

        let lease = Lease {
            id: Uuid::new_v4(),
            allotment_id: allotment.id,
            token_hash: token_hash.to_string(),
            issued_at: now,
            last_heartbeat_at: now,
            expires_at: allotment.preview_ends_at,
        };

        slot.leases.push(lease.clone());
        self.token_index.insert(token_hash.to_string(), allotment.id);

        Ok(AdmitOutcome::Admitted(lease))
    }

    async fn refresh(&self, token_hash: &str, allotment_id: Uuid) -> AppResult<bool> {
        let slot = self.slot(allotment_id);
        let mut slot = slot.lock().await;

        let now = Utc::now();
        match slot
            .leases
            .iter_mut()
            .find(|l| l.token_hash == token_hash && l.is_fresh(self.ttl, now))
        {
            Some(lease) => {
                lease.last_heartbeat_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_fresh(&self, token_hash: &str) -> AppResult<Option<Lease>> {
        let Some(allotment_id) = self.token_index.get(token_hash).map(|e| *e) else {
            return Ok(None);
        };

        let slot = self.slot(allotment_id);
        let slot = slot.lock().await;

        let now = Utc::now();
        Ok(slot
            .leases
            .iter()
            .find(|l| l.token_hash == token_hash && l.is_fresh(self.ttl, now))
            .cloned())
    }

    async fn count_fresh(&self, allotment_id: Uuid) -> AppResult<u32> {
        let slot = self.slot(allotment_id);
        let slot = slot.lock().await;

        let now = Utc::now();
        Ok(slot
            .leases
            .iter()
            .filter(|l| l.is_fresh(self.ttl, now))
            .count() as u32)
    }

    async fn purge_stale(&self, older_than: DateTime<Utc>) -> AppResult<u64> {
        let mut purged = 0u64;

        let slot_refs: Vec<Arc<Mutex<Slot>>> = self
            .slots
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        for slot in slot_refs {
            let mut slot = slot.lock().await;
            let before = slot.leases.len();
            slot.leases.retain(|l| {
                let keep = l.last_heartbeat_at >= older_than;
                if !keep {
                    self.token_index.remove(&l.token_hash);
                }
                keep
            });
            purged += (before - slot.leases.len()) as u64;
        }

        Ok(purged)
    }
}
