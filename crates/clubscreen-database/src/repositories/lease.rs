//! Lease repository — the durable side of the lease registry.
//!
//! All lease SQL lives here, including the capacity-guarded insert that
//! serializes admissions per allotment. Freshness is always derived live
//! from `last_heartbeat_at` and the optional `expires_at` ceiling; there
//! is no stored status column to flip.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use clubscreen_core::error::{AppError, ErrorKind};
use clubscreen_core::result::AppResult;
use clubscreen_entity::Lease;

/// Repository for lease persistence and occupancy queries.
#[derive(Debug, Clone)]
pub struct LeaseRepository {
    pool: PgPool,
}

impl LeaseRepository {
    /// Create a new lease repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Atomically insert a lease if the allotment still has a fresh seat.
    ///
    /// One transaction: lock the allotment row (`FOR UPDATE`), count fresh
    /// leases against the locked row's capacity, insert only if below it.
    /// This is the single serialization point for admission; concurrent
    /// callers for the same allotment queue on the row lock, while other
    /// allotments proceed independently. Returns `None` when the allotment
    /// is at capacity.
    pub async fn insert_if_capacity(
        &self,
        allotment_id: Uuid,
        token_hash: &str,
        fresh_cutoff: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<Option<Lease>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin admission", e)
        })?;

        let capacity: Option<i32> =
            sqlx::query_scalar("SELECT capacity FROM allotments WHERE id = $1 FOR UPDATE")
                .bind(allotment_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to lock allotment", e)
                })?;

        let Some(capacity) = capacity else {
            return Err(AppError::not_found(format!(
                "Allotment {allotment_id} not found"
            )));
        };

        let occupied: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM leases WHERE allotment_id = $1 AND last_heartbeat_at > $2 \
             AND (expires_at IS NULL OR expires_at > NOW())",
        )
        .bind(allotment_id)
        .bind(fresh_cutoff)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count fresh leases", e)
        })?;

        if occupied >= i64::from(capacity) {
            tx.rollback().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to release admission lock", e)
            })?;
            return Ok(None);
        }

        let lease = sqlx::query_as::<_, Lease>(
            "INSERT INTO leases (id, allotment_id, token_hash, issued_at, last_heartbeat_at, expires_at) \
             VALUES ($1, $2, $3, NOW(), NOW(), $4) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(allotment_id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert lease", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit admission", e)
        })?;

        Ok(Some(lease))
    }

    /// Bump `last_heartbeat_at` iff the lease is still fresh and belongs to
    /// the given allotment. Returns whether a row was updated; a stale or
    /// unknown token updates nothing.
    pub async fn refresh_if_fresh(
        &self,
        token_hash: &str,
        allotment_id: Uuid,
        fresh_cutoff: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE leases SET last_heartbeat_at = NOW() \
             WHERE token_hash = $1 AND allotment_id = $2 AND last_heartbeat_at > $3 \
             AND (expires_at IS NULL OR expires_at > NOW())",
        )
        .bind(token_hash)
        .bind(allotment_id)
        .bind(fresh_cutoff)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to refresh lease", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Find the fresh lease behind a token digest, if any.
    pub async fn find_fresh_by_token_hash(
        &self,
        token_hash: &str,
        fresh_cutoff: DateTime<Utc>,
    ) -> AppResult<Option<Lease>> {
        sqlx::query_as::<_, Lease>(
            "SELECT * FROM leases WHERE token_hash = $1 AND last_heartbeat_at > $2 \
             AND (expires_at IS NULL OR expires_at > NOW())",
        )
        .bind(token_hash)
        .bind(fresh_cutoff)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find lease", e))
    }

    /// Count the fresh leases currently occupying an allotment.
    pub async fn count_fresh(
        &self,
        allotment_id: Uuid,
        fresh_cutoff: DateTime<Utc>,
    ) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM leases WHERE allotment_id = $1 AND last_heartbeat_at > $2 \
             AND (expires_at IS NULL OR expires_at > NOW())",
        )
        .bind(allotment_id)
        .bind(fresh_cutoff)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count fresh leases", e)
        })
    }

    /// Hard-delete leases whose last heartbeat predates the cutoff.
    /// Storage hygiene only; stale leases already stopped counting.
    pub async fn delete_stale_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM leases WHERE last_heartbeat_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge stale leases", e)
            })?;

        Ok(result.rows_affected())
    }
}
