//! Lease registry — the single source of truth for seat occupancy.
//!
//! The registry owns the one operation that must serialize: counting an
//! allotment's fresh leases and inserting a new one as a single atomic
//! unit. Everything else (refresh, lookup, purge) is an independent
//! single-row affair.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use clubscreen_core::result::AppResult;
use clubscreen_entity::{Allotment, Lease};

pub use memory::MemoryLeaseRegistry;
pub use postgres::PgLeaseRegistry;

/// Result of attempting to admit a new viewing session.
#[derive(Debug, Clone)]
pub enum AdmitOutcome {
    /// A seat was free; the lease was created.
    Admitted(Lease),
    /// Every seat of the allotment is held by a fresh lease.
    CapacityExceeded,
}

/// Durable registry of leases per allotment.
///
/// Implementations must guarantee that `admit` is atomic with respect to
/// concurrent `admit` calls for the same allotment, and that admissions
/// for different allotments never contend with each other.
#[async_trait]
pub trait LeaseRegistry: Send + Sync + std::fmt::Debug {
    /// Atomically create a lease if the allotment has a fresh seat left.
    async fn admit(&self, allotment: &Allotment, token_hash: &str) -> AppResult<AdmitOutcome>;

    /// Bump the heartbeat of a fresh lease belonging to the allotment.
    /// Returns `false` for unknown, stale, or cross-allotment tokens;
    /// never creates or resurrects a lease.
    async fn refresh(&self, token_hash: &str, allotment_id: Uuid) -> AppResult<bool>;

    /// Look up the fresh lease behind a token digest, if any.
    async fn find_fresh(&self, token_hash: &str) -> AppResult<Option<Lease>>;

    /// Number of fresh leases currently occupying the allotment.
    async fn count_fresh(&self, allotment_id: Uuid) -> AppResult<u32>;

    /// Hard-delete leases whose last heartbeat predates `older_than`.
    /// Returns the number purged. Storage hygiene only.
    async fn purge_stale(&self, older_than: DateTime<Utc>) -> AppResult<u64>;
}
