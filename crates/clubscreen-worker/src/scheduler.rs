//! Cron scheduler for the periodic lease sweep.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use clubscreen_auth::session::LeaseReaper;
use clubscreen_core::error::AppError;

/// Cron-based scheduler driving the lease reaper.
///
/// The sweep is storage hygiene: the capacity invariant is enforced at
/// admission time from live timestamps, so a missed or disabled sweep
/// never over-grants seats.
pub struct ReaperScheduler {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
    /// The reaper invoked on each tick.
    reaper: Arc<LeaseReaper>,
}

impl std::fmt::Debug for ReaperScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaperScheduler").finish()
    }
}

impl ReaperScheduler {
    /// Create a new scheduler.
    pub async fn new(reaper: Arc<LeaseReaper>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler, reaper })
    }

    /// Register the lease sweep on the given cron schedule.
    pub async fn register_lease_sweep(&self, schedule: &str) -> Result<(), AppError> {
        let reaper = Arc::clone(&self.reaper);
        let job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let reaper = Arc::clone(&reaper);
            Box::pin(async move {
                match reaper.run_sweep().await {
                    Ok(purged) => {
                        tracing::debug!(purged, "Lease sweep completed");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Lease sweep failed");
                    }
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create lease sweep job: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add lease sweep job: {e}")))?;

        tracing::info!(schedule = %schedule, "Registered: lease sweep");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Reaper scheduler started");
        Ok(())
    }

    /// Shut the scheduler down.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Reaper scheduler shut down");
        Ok(())
    }
}
