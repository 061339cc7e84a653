use crate::cache::QueryCache;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::info;

/// Start the periodic cache refresh.
///
/// Writes made through another instance never reach this process's cache,
/// so every tag is dropped on `cron_expr` (six-field cron, seconds first).
pub async fn start_scheduler(cache: Arc<QueryCache>, cron_expr: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new()
        .await
        .context("Failed to create job scheduler")?;

    info!("Scheduling cache refresh (cron: {})", cron_expr);

    let job = Job::new_async(cron_expr, move |_uuid, _l| {
        let cache = Arc::clone(&cache);
        Box::pin(async move {
            refresh_caches(&cache);
        })
    })
    .with_context(|| format!("Invalid CACHE_REFRESH_CRON '{}'", cron_expr))?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    info!("✓ Scheduler started");

    Ok(scheduler)
}

/// Drop every cached list so the next reads go to the backend.
pub fn refresh_caches(cache: &QueryCache) {
    cache.invalidate_all();
    info!("⏰ Content caches refreshed");
}
