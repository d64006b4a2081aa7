use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::jobs::models::{JobEntity, JobStatus};
use crate::jobs::transport::serialize_decimal;

/// Keyed record store for analysed jobs.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Inserts or overwrites the record with the same `job_id`.
    async fn upsert(&self, job: &JobEntity) -> Result<()>;

    /// All records with the given status, newest `posted_date` first.
    async fn list_by_status(&self, status: JobStatus) -> Result<Vec<StoredJob>>;
}

/// A job as read back from storage. The score keeps the store's decimal type.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct StoredJob {
    pub job_id: Uuid,
    pub title: String,
    pub company: String,
    pub original_url: String,
    pub description: String,
    pub summary: String,
    pub is_verified: bool,
    pub verification_score: Decimal,
    pub flags: Vec<String>,
    pub category: String,
    pub posted_date: NaiveDate,
    pub status: String,
}

impl From<&JobEntity> for StoredJob {
    fn from(job: &JobEntity) -> Self {
        Self {
            job_id: job.job_id,
            title: job.title.clone(),
            company: job.company.clone(),
            original_url: job.original_url.clone(),
            description: job.description.clone(),
            summary: job.summary.clone(),
            is_verified: job.is_verified,
            verification_score: Decimal::from(job.scam_analysis.score),
            flags: job.scam_analysis.flags.clone(),
            category: job.category.clone(),
            posted_date: job.posted_date,
            status: job.status.as_str().to_string(),
        }
    }
}

/// Wire shape served by the read API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub job_id: Uuid,
    pub title: String,
    pub company: String,
    pub original_url: String,
    pub description: String,
    pub summary: String,
    pub is_verified: bool,
    pub scam_analysis: ScamAnalysisView,
    pub category: String,
    pub posted_date: NaiveDate,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ScamAnalysisView {
    #[serde(serialize_with = "serialize_decimal")]
    pub score: Decimal,
    pub flags: Vec<String>,
}

impl From<StoredJob> for JobView {
    fn from(row: StoredJob) -> Self {
        Self {
            job_id: row.job_id,
            title: row.title,
            company: row.company,
            original_url: row.original_url,
            description: row.description,
            summary: row.summary,
            is_verified: row.is_verified,
            scam_analysis: ScamAnalysisView {
                score: row.verification_score,
                flags: row.flags,
            },
            category: row.category,
            posted_date: row.posted_date,
            status: row.status,
        }
    }
}

/// Postgres-backed `JobStore`.
#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn upsert(&self, job: &JobEntity) -> Result<()> {
        let row = StoredJob::from(job);
        sqlx::query(
            r#"
            INSERT INTO jobs
                (job_id, title, company, original_url, description, summary,
                 is_verified, verification_score, flags, category, posted_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (job_id) DO UPDATE SET
                title = EXCLUDED.title,
                company = EXCLUDED.company,
                original_url = EXCLUDED.original_url,
                description = EXCLUDED.description,
                summary = EXCLUDED.summary,
                is_verified = EXCLUDED.is_verified,
                verification_score = EXCLUDED.verification_score,
                flags = EXCLUDED.flags,
                category = EXCLUDED.category,
                posted_date = EXCLUDED.posted_date,
                status = EXCLUDED.status
            "#,
        )
        .bind(row.job_id)
        .bind(&row.title)
        .bind(&row.company)
        .bind(&row.original_url)
        .bind(&row.description)
        .bind(&row.summary)
        .bind(row.is_verified)
        .bind(row.verification_score)
        .bind(&row.flags)
        .bind(&row.category)
        .bind(row.posted_date)
        .bind(&row.status)
        .execute(&self.pool)
        .await?;

        debug!("Upserted job {}", row.job_id);
        Ok(())
    }

    async fn list_by_status(&self, status: JobStatus) -> Result<Vec<StoredJob>> {
        Ok(sqlx::query_as::<_, StoredJob>(
            r#"
            SELECT job_id, title, company, original_url, description, summary,
                   is_verified, verification_score, flags, category, posted_date, status
            FROM jobs
            WHERE status = $1
            ORDER BY posted_date DESC
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::models::{AnalysisResult, JobPosting};

    fn entity(score: i64) -> JobEntity {
        let posting = JobPosting {
            title: Some("IT Support Specialist (Entry-Level)".into()),
            company: Some("Corporate Systems PLC".into()),
            location: Some("Mombasa, Kenya".into()),
            url: Some("https://www.example.com/job/it5".into()),
            description: Some("Provide first-line technical support.".into()),
        };
        let analysis = AnalysisResult {
            summary: "Help desk role".into(),
            verification_score: score,
            flags: vec!["clear application process".into()],
            category: "IT & Software".into(),
        };
        JobEntity::from_analysis(&posting, analysis, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap())
    }

    #[test]
    fn test_stored_job_from_entity() {
        let job = entity(82);
        let row = StoredJob::from(&job);
        assert_eq!(row.job_id, job.job_id);
        assert_eq!(row.verification_score, Decimal::from(82));
        assert_eq!(row.status, "ACTIVE");
        assert_eq!(row.flags, job.scam_analysis.flags);
    }

    #[test]
    fn test_job_view_matches_legacy_wire_shape() {
        let view = JobView::from(StoredJob::from(&entity(82)));
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["scamAnalysis"]["score"], serde_json::json!(82));
        assert!(value["scamAnalysis"]["score"].is_i64());
        assert_eq!(value["scamAnalysis"]["flags"][0], "clear application process");
        assert_eq!(value["originalUrl"], "https://www.example.com/job/it5");
        assert_eq!(value["postedDate"], "2025-05-01");
        assert_eq!(value["isVerified"], true);
        assert_eq!(value["status"], "ACTIVE");
        assert!(value.get("jobId").is_some());
    }

    #[test]
    fn test_job_view_fractional_score_is_float() {
        let mut row = StoredJob::from(&entity(70));
        row.verification_score = Decimal::new(705, 1);
        let value = serde_json::to_value(JobView::from(row)).unwrap();
        assert_eq!(value["scamAnalysis"]["score"], serde_json::json!(70.5));
    }
}
