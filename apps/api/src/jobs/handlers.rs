//! Axum route handlers for the jobs API.

use axum::{extract::State, Json};
use bytes::Bytes;
use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::jobs::events::ObjectLocation;
use crate::jobs::models::JobStatus;
use crate::jobs::processor::BatchReport;
use crate::jobs::scraper::{run_scrape, ScrapeReport};
use crate::jobs::store::JobView;
use crate::state::AppState;

/// GET /api/v1/jobs
///
/// Active jobs, newest first.
pub async fn handle_list_jobs(State(state): State<AppState>) -> Result<Json<Vec<JobView>>, AppError> {
    info!("Received request for jobs API");

    let rows = state
        .jobs
        .list_by_status(JobStatus::Active)
        .await
        .map_err(AppError::Storage)?;

    info!("Successfully retrieved {} jobs from the job store", rows.len());
    Ok(Json(rows.into_iter().map(JobView::from).collect()))
}

/// POST /api/v1/jobs/process
///
/// Receives an object-storage write notification and analyses the uploaded snapshot.
/// The body is parsed here so that unreadable events get the usual error envelope.
pub async fn handle_process_event(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<BatchReport>, AppError> {
    let event: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Malformed event. Body is not valid JSON: {e}")))?;
    let location = ObjectLocation::from_event(&event)?;
    let report = state
        .processor()
        .process_object(state.objects.as_ref(), &location, Utc::now().date_naive())
        .await?;
    Ok(Json(report))
}

/// POST /api/v1/scrape
///
/// Runs collection immediately, outside the cron schedule.
pub async fn handle_scrape(State(state): State<AppState>) -> Result<Json<ScrapeReport>, AppError> {
    let report = run_scrape(&state.objects, &state.config.s3_bucket, Utc::now())
        .await
        .map_err(|e| AppError::S3(format!("{e:#}")))?;
    Ok(Json(report))
}
