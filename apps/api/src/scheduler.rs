//! Cron-driven collection. The scheduler runs independently of the HTTP
//! surface; `POST /api/v1/scrape` triggers the same work on demand.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::jobs::scraper::run_scrape;
use crate::objects::ObjectStore;

/// Start the periodic scrape task on `cron` (six fields, seconds first).
pub async fn start_scheduler(
    objects: Arc<dyn ObjectStore>,
    bucket: String,
    cron: &str,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;
    scheduler.add(scrape_job(objects, bucket, cron)?).await?;
    scheduler.start().await?;

    tracing::info!("Scheduled scrape task started ({cron})");
    Ok(scheduler)
}

fn scrape_job(objects: Arc<dyn ObjectStore>, bucket: String, cron: &str) -> Result<Job> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let objects = objects.clone();
        let bucket = bucket.clone();
        Box::pin(async move {
            match run_scrape(&objects, &bucket, Utc::now()).await {
                Ok(report) => tracing::info!("{}", report.message),
                Err(e) => tracing::error!("Scheduled scrape failed: {e:#}"),
            }
        })
    })?;
    Ok(job)
}
