//! Lease freshness and reaper configuration.

use serde::{Deserialize, Serialize};

/// Lease and heartbeat configuration.
///
/// `heartbeat_ttl_seconds` is the operative timeout of the whole subsystem:
/// a lease whose last heartbeat is older than this no longer counts toward
/// its allotment's occupancy. It should be roughly twice the client
/// heartbeat interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseConfig {
    /// Freshness window in seconds after the last heartbeat.
    #[serde(default = "default_heartbeat_ttl")]
    pub heartbeat_ttl_seconds: u64,
    /// Interval in seconds at which clients are told to heartbeat.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_seconds: u64,
    /// Reaper sweep configuration.
    #[serde(default)]
    pub reaper: ReaperConfig,
}

/// Reaper sweep configuration.
///
/// The reaper hard-deletes leases that have been stale for
/// `stale_multiplier × heartbeat_ttl`. Storage hygiene only — the capacity
/// invariant never depends on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaperConfig {
    /// Whether the periodic sweep is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron schedule for the sweep (seconds-resolution cron).
    #[serde(default = "default_schedule")]
    pub schedule: String,
    /// Leases older than `stale_multiplier × heartbeat_ttl` are purged.
    #[serde(default = "default_stale_multiplier")]
    pub stale_multiplier: u32,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule: default_schedule(),
            stale_multiplier: default_stale_multiplier(),
        }
    }
}

impl LeaseConfig {
    /// Freshness window as a chrono duration.
    pub fn heartbeat_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.heartbeat_ttl_seconds as i64)
    }

    /// Age beyond which the reaper may hard-delete a lease.
    pub fn reap_age(&self) -> chrono::Duration {
        self.heartbeat_ttl() * self.reaper.stale_multiplier as i32
    }
}

fn default_heartbeat_ttl() -> u64 {
    90
}

fn default_heartbeat_interval() -> u64 {
    45
}

fn default_true() -> bool {
    true
}

fn default_schedule() -> String {
    // every 5 minutes
    "0 */5 * * * *".to_string()
}

fn default_stale_multiplier() -> u32 {
    2
}
