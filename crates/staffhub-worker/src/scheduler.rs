//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use staffhub_core::error::AppError;

use crate::jobs::{ClockResyncJob, WindowSweepJob};

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Out-of-window session sweep
    sweep: Arc<WindowSweepJob>,
    /// Clock resynchronization
    resync: Arc<ClockResyncJob>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(sweep: WindowSweepJob, resync: ClockResyncJob) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            sweep: Arc::new(sweep),
            resync: Arc::new(resync),
        })
    }

    /// Register all default scheduled tasks
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_window_sweep().await?;
        self.register_clock_resync().await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Window sweep — every minute
    async fn register_window_sweep(&self) -> Result<(), AppError> {
        let sweep = Arc::clone(&self.sweep);
        let job = CronJob::new_async("0 * * * * *", move |_uuid, _lock| {
            let sweep = Arc::clone(&sweep);
            Box::pin(async move {
                tracing::trace!("Running window sweep");
                sweep.run().await;
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create window_sweep schedule: {}", e))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add window_sweep schedule: {}", e))
        })?;

        tracing::info!("Registered: window_sweep (every 1min)");
        Ok(())
    }

    /// Clock resync — every 5 minutes
    async fn register_clock_resync(&self) -> Result<(), AppError> {
        let resync = Arc::clone(&self.resync);
        let job = CronJob::new_async("0 */5 * * * *", move |_uuid, _lock| {
            let resync = Arc::clone(&resync);
            Box::pin(async move {
                tracing::trace!("Running clock resync");
                resync.run().await;
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create clock_resync schedule: {}", e))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add clock_resync schedule: {}", e))
        })?;

        tracing::info!("Registered: clock_resync (every 5min)");
        Ok(())
    }
}
