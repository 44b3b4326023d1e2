//! Viewing session lease entity.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A record of one active viewing session against an allotment.
///
/// A lease only ever moves forward: created, refreshed by heartbeats,
/// implicitly stale once the freshness window lapses, and eventually
/// purged by the reaper. Staleness is always derived from timestamps at
/// read time; there is no stored status column.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lease {
    /// Unique lease identifier.
    pub id: Uuid,
    /// The allotment whose seat this lease occupies.
    pub allotment_id: Uuid,
    /// SHA-256 hex digest of the opaque bearer token. The plaintext token
    /// is handed to the client exactly once and never stored.
    pub token_hash: String,
    /// When the lease was granted.
    pub issued_at: DateTime<Utc>,
    /// When the last heartbeat arrived.
    pub last_heartbeat_at: DateTime<Utc>,
    /// Hard ceiling (end of the preview window), if any.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Lease {
    /// Whether the lease counts toward occupancy at `now`.
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.last_heartbeat_at < ttl
            && self.expires_at.map_or(true, |ceiling| now < ceiling)
    }

    /// The instant at which this lease stops counting, absent further
    /// heartbeats.
    pub fn fresh_until(&self, ttl: Duration) -> DateTime<Utc> {
        let window_end = self.last_heartbeat_at + ttl;
        match self.expires_at {
            Some(ceiling) if ceiling < window_end => ceiling,
            _ => window_end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lease_at(last_heartbeat_at: DateTime<Utc>, expires_at: Option<DateTime<Utc>>) -> Lease {
        Lease {
            id: Uuid::new_v4(),
            allotment_id: Uuid::new_v4(),
            token_hash: "0".repeat(64),
            issued_at: last_heartbeat_at,
            last_heartbeat_at,
            expires_at,
        }
    }

    #[test]
    fn fresh_within_window() {
        let now = Utc::now();
        let lease = lease_at(now - Duration::seconds(30), None);
        assert!(lease.is_fresh(Duration::seconds(90), now));
    }

    #[test]
    fn stale_after_window() {
        let now = Utc::now();
        let lease = lease_at(now - Duration::seconds(90), None);
        assert!(!lease.is_fresh(Duration::seconds(90), now));
    }

    #[test]
    fn expiry_ceiling_overrides_heartbeat() {
        let now = Utc::now();
        let lease = lease_at(now, Some(now - Duration::seconds(1)));
        assert!(!lease.is_fresh(Duration::seconds(90), now));
    }

    #[test]
    fn fresh_until_respects_ceiling() {
        let now = Utc::now();
        let ceiling = now + Duration::seconds(10);
        let lease = lease_at(now, Some(ceiling));
        assert_eq!(lease.fresh_until(Duration::seconds(90)), ceiling);

        let unbounded = lease_at(now, None);
        assert_eq!(
            unbounded.fresh_until(Duration::seconds(90)),
            now + Duration::seconds(90)
        );
    }
}
