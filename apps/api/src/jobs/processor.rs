//! Analysis batch: snapshot → model → normalizer → job store.
//!
//! Records are handled one at a time. A failed model call degrades to a
//! defaulted analysis; a failed store write is recorded and the batch moves on.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::events::ObjectLocation;
use crate::jobs::models::{JobEntity, JobPosting, DEFAULT_TEXT};
use crate::jobs::normalizer::{normalize, Diagnosis};
use crate::jobs::prompts::{build_analysis_prompt, JOB_ANALYSIS_PROMPT_VERSION};
use crate::jobs::store::JobStore;
use crate::llm_client::TextModel;
use crate::objects::ObjectStore;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFailure {
    /// Absent for entries that never became a posting.
    pub job_id: Option<Uuid>,
    pub title: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub message: String,
    pub processed: usize,
    pub saved: usize,
    /// Records whose model output could not be used and were saved with defaults.
    pub defaulted: usize,
    pub failed: Vec<RecordFailure>,
}

pub struct JobProcessor {
    store: Arc<dyn JobStore>,
    model: Arc<dyn TextModel>,
}

impl JobProcessor {
    pub fn new(store: Arc<dyn JobStore>, model: Arc<dyn TextModel>) -> Self {
        Self { store, model }
    }

    /// Reads the snapshot at `location` and processes every posting in it.
    pub async fn process_object(
        &self,
        objects: &dyn ObjectStore,
        location: &ObjectLocation,
        posted_date: NaiveDate,
    ) -> Result<BatchReport, AppError> {
        info!(
            "Processing file {} from bucket {}",
            location.key, location.bucket
        );

        let body = objects
            .get(&location.bucket, &location.key)
            .await
            .map_err(|e| AppError::S3(format!("{e:#}")))?;
        let entries = parse_snapshot(&body)?;

        info!(
            "Successfully read {} jobs from object {}",
            entries.len(),
            location.key
        );

        Ok(self.process_entries(&entries, posted_date).await)
    }

    /// Converts raw snapshot entries leniently. Entries that are not objects
    /// are reported as failures; the rest go through `process_postings`.
    pub async fn process_entries(&self, entries: &[Value], posted_date: NaiveDate) -> BatchReport {
        let mut postings = Vec::with_capacity(entries.len());
        let mut rejected = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            match JobPosting::from_entry(entry) {
                Some(posting) => postings.push(posting),
                None => {
                    warn!("Skipping snapshot entry {index}: not a job posting object");
                    rejected.push(RecordFailure {
                        job_id: None,
                        title: DEFAULT_TEXT.to_string(),
                        error: format!("entry {index} is not a job posting object"),
                    });
                }
            }
        }

        let mut report = self.process_postings(&postings, posted_date).await;
        report.processed += rejected.len();
        report.failed.extend(rejected);
        report
    }

    pub async fn process_postings(&self, postings: &[JobPosting], posted_date: NaiveDate) -> BatchReport {
        info!(
            prompt_version = JOB_ANALYSIS_PROMPT_VERSION,
            "Analysing {} postings",
            postings.len()
        );

        let mut saved = 0;
        let mut defaulted = 0;
        let mut failed = Vec::new();

        for posting in postings {
            let (job, diagnosis) = self.analyse(posting, posted_date).await;
            if !diagnosis.is_parsed() {
                defaulted += 1;
            }

            match self.store.upsert(&job).await {
                Ok(()) => {
                    saved += 1;
                    info!("Successfully processed and saved job: {}", job.job_id);
                }
                Err(e) => {
                    error!("Failed to save job {} ({}): {e:#}", job.job_id, job.title);
                    failed.push(RecordFailure {
                        job_id: Some(job.job_id),
                        title: job.title.clone(),
                        error: "storage write failed".to_string(),
                    });
                }
            }
        }

        if !failed.is_empty() {
            warn!(
                "Batch finished with {} of {} records failing to save",
                failed.len(),
                postings.len()
            );
        }

        BatchReport {
            message: "Processing complete!".to_string(),
            processed: postings.len(),
            saved,
            defaulted,
            failed,
        }
    }

    /// Builds the entity for one posting. Never fails: any model problem yields defaults.
    pub async fn analyse(&self, posting: &JobPosting, posted_date: NaiveDate) -> (JobEntity, Diagnosis) {
        let title = posting.title();
        info!("Processing job: {} at {}", title, posting.company());

        let prompt = build_analysis_prompt(posting.description());
        let raw = match self.model.complete(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!("Model call failed for job {title}: {e}");
                String::new()
            }
        };

        let normalized = normalize(&raw, title);
        info!("Model analysis complete for job: {title}");

        let job = JobEntity::from_analysis(posting, normalized.analysis, posted_date);
        (job, normalized.diagnosis)
    }
}

/// The snapshot must be a JSON array. Its elements are not checked here.
pub fn parse_snapshot(body: &[u8]) -> Result<Vec<Value>, AppError> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Object is not a JSON array: {e}")))
}
