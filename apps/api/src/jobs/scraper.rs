//! Job collection. Live job boards block automated fetches, so collection
//! publishes a fixed set of sample postings as a timestamped snapshot.

use std::sync::Arc;

use anyhow::{Context, Result};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::jobs::models::JobPosting;
use crate::objects::ObjectStore;

const SNAPSHOT_CONTENT_TYPE: &str = "application/json";

/// (title, company, location, url, description)
const SAMPLE_JOBS: [(&str, &str, &str, &str, &str); 11] = [
    (
        "Software Engineer (Junior)",
        "Tech Innovations Ltd.",
        "Nairobi, Kenya",
        "https://www.example.com/job/it1",
        "Develop and maintain web applications using Python and JavaScript. Collaborate with senior engineers on new features and bug fixes. Strong problem-solving skills required.",
    ),
    (
        "Data Analyst Trainee",
        "Analytics Hub Africa",
        "Remote",
        "https://www.example.com/job/it2",
        "Assist in collecting, cleaning, and interpreting data sets. Create reports and dashboards to visualize insights. Proficiency in Excel and basic SQL is a plus.",
    ),
    (
        "Cybersecurity Intern",
        "SecureNet Solutions",
        "Nairobi, Kenya",
        "https://www.example.com/job/it3",
        "Learn and assist in identifying security vulnerabilities, monitoring network traffic, and implementing security protocols. Basic understanding of networking concepts required.",
    ),
    (
        "UI/UX Designer Apprentice",
        "Creative Digital Agency",
        "Remote",
        "https://www.example.com/job/it4",
        "Work alongside experienced designers to create intuitive and aesthetically pleasing user interfaces. Learn about user research, wireframing, and prototyping tools.",
    ),
    (
        "IT Support Specialist (Entry-Level)",
        "Corporate Systems PLC",
        "Mombasa, Kenya",
        "https://www.example.com/job/it5",
        "Provide first-line technical support to employees, troubleshoot hardware and software issues, and assist with IT infrastructure maintenance. Good communication skills essential.",
    ),
    (
        "Legal Assistant",
        "Lex Chambers Advocates",
        "Nairobi, Kenya",
        "https://www.example.com/job/law1",
        "Support legal team with research, document preparation, and case management. Requires strong organizational skills and attention to detail. Law degree or diploma preferred.",
    ),
    (
        "Junior Associate - Corporate Law",
        "Kenya Legal Partners",
        "Nairobi, Kenya",
        "https://www.example.com/job/law2",
        "Opportunity for a recent law graduate to gain experience in corporate legal matters. Assist in drafting contracts, conducting due diligence, and client liaison.",
    ),
    (
        "Administrative Officer (Government)",
        "Ministry of Public Service",
        "Nairobi, Kenya",
        "https://www.example.com/job/gov1",
        "Manage office operations, coordinate meetings, and handle official correspondence. Requires excellent organizational and communication skills. Public administration background is a plus.",
    ),
    (
        "Policy Analyst Intern",
        "National Development Agency",
        "Nairobi, Kenya",
        "https://www.example.com/job/gov2",
        "Assist in researching and analyzing public policies, preparing policy briefs, and contributing to strategic planning. Strong analytical and writing skills are essential.",
    ),
    (
        "Executive Assistant",
        "Apex Holdings Group",
        "Nairobi, Kenya",
        "https://www.example.com/job/office1",
        "Provide high-level administrative support to senior executives, manage schedules, arrange travel, and prepare presentations. Discretion and proactive approach are key.",
    ),
    (
        "Project Coordinator (Entry-Level)",
        "Innovate Solutions Inc.",
        "Nairobi, Kenya",
        "https://www.example.com/job/office2",
        "Support project managers in planning, execution, and monitoring of various projects. Assist with documentation, scheduling, and stakeholder communication. Organizational skills are vital.",
    ),
];

pub fn sample_jobs() -> Vec<JobPosting> {
    SAMPLE_JOBS
        .iter()
        .map(|(title, company, location, url, description)| JobPosting {
            title: Some(title.to_string()),
            company: Some(company.to_string()),
            location: Some(location.to_string()),
            url: Some(url.to_string()),
            description: Some(description.to_string()),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
    pub message: String,
    pub bucket: String,
    pub key: String,
    pub jobs: usize,
}

pub fn snapshot_key(at: DateTime<Utc>) -> String {
    format!("scraped-jobs-{}.json", at.format("%Y-%m-%d-%H-%M-%S"))
}

/// Pretty-printed with a four-space indent, like the snapshots already in the bucket.
pub fn encode_snapshot(jobs: &[JobPosting]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    jobs.serialize(&mut serializer)
        .context("Failed to encode job snapshot")?;
    Ok(out)
}

/// Collects postings and uploads them to `bucket` as one JSON array.
pub async fn run_scrape(
    objects: &Arc<dyn ObjectStore>,
    bucket: &str,
    at: DateTime<Utc>,
) -> Result<ScrapeReport> {
    info!("Starting job scrape at {at}");

    let jobs = sample_jobs();
    info!("Using {} sample jobs for processing", jobs.len());

    let key = snapshot_key(at);
    let body = encode_snapshot(&jobs)?;
    objects
        .put(bucket, &key, Bytes::from(body), SNAPSHOT_CONTENT_TYPE)
        .await?;

    info!(
        "Successfully uploaded {key} to {bucket} with {} jobs",
        jobs.len()
    );

    Ok(ScrapeReport {
        message: format!(
            "Successfully processed and saved {} jobs to {key}",
            jobs.len()
        ),
        bucket: bucket.to_string(),
        key,
        jobs: jobs.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryObjectStore;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap()
    }

    #[test]
    fn test_snapshot_key_format() {
        assert_eq!(snapshot_key(at()), "scraped-jobs-2025-02-03-04-05-06.json");
    }

    #[test]
    fn test_sample_jobs_are_complete_and_unique() {
        let jobs = sample_jobs();
        assert_eq!(jobs.len(), 11);
        let mut ids: Vec<_> = jobs.iter().map(JobPosting::job_id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 11);
        assert!(jobs.iter().all(|j| j.description.as_deref().is_some_and(|d| !d.is_empty())));
    }

    #[test]
    fn test_snapshot_uses_four_space_indent() {
        let body = String::from_utf8(encode_snapshot(&sample_jobs()[..1]).unwrap()).unwrap();
        assert!(body.starts_with("[\n    {\n        \"title\": \"Software Engineer (Junior)\""));
    }

    #[tokio::test]
    async fn test_run_scrape_uploads_parseable_snapshot() {
        let store = Arc::new(MemoryObjectStore::default());
        let objects: Arc<dyn ObjectStore> = store.clone();

        let report = run_scrape(&objects, "ajira-raw", at()).await.unwrap();

        assert_eq!(report.jobs, 11);
        assert_eq!(report.key, "scraped-jobs-2025-02-03-04-05-06.json");
        assert_eq!(
            report.message,
            "Successfully processed and saved 11 jobs to scraped-jobs-2025-02-03-04-05-06.json"
        );

        let (body, content_type) = store.object("ajira-raw", &report.key).unwrap();
        assert_eq!(content_type, "application/json");
        let parsed: Vec<JobPosting> = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed, sample_jobs());
    }

    #[tokio::test]
    async fn test_run_scrape_surfaces_upload_failure() {
        let store = Arc::new(MemoryObjectStore::default());
        store.fail_puts();
        let objects: Arc<dyn ObjectStore> = store;
        assert!(run_scrape(&objects, "ajira-raw", at()).await.is_err());
    }
}
