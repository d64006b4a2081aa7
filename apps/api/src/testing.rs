//! In-memory stand-ins for the external collaborators, used by unit tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;

use crate::jobs::models::{JobEntity, JobStatus};
use crate::jobs::store::{JobStore, StoredJob};
use crate::llm_client::{LlmError, TextModel};
use crate::objects::ObjectStore;

#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<(String, String), (Bytes, String)>>,
    fail_puts: AtomicBool,
}

impl MemoryObjectStore {
    pub fn insert(&self, bucket: &str, key: &str, body: impl Into<Bytes>) {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            (body.into(), "application/json".to_string()),
        );
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<(Bytes, String)> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn fail_puts(&self) {
        self.fail_puts.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.object(bucket, key)
            .map(|(body, _)| body)
            .ok_or_else(|| anyhow!("NoSuchKey: s3://{bucket}/{key}"))
    }

    async fn put(&self, bucket: &str, key: &str, body: Bytes, content_type: &str) -> Result<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(anyhow!("AccessDenied: s3://{bucket}/{key}"));
        }
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            (body, content_type.to_string()),
        );
        Ok(())
    }
}

/// Keeps rows keyed by id; titles in `failing_titles` make `upsert` fail.
#[derive(Default)]
pub struct MemoryJobStore {
    rows: Mutex<HashMap<uuid::Uuid, StoredJob>>,
    failing_titles: Mutex<HashSet<String>>,
    fail_reads: AtomicBool,
}

impl MemoryJobStore {
    pub fn fail_upserts_for(&self, title: &str) {
        self.failing_titles.lock().unwrap().insert(title.to_string());
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn insert_row(&self, row: StoredJob) {
        self.rows.lock().unwrap().insert(row.job_id, row);
    }

    pub fn rows(&self) -> Vec<StoredJob> {
        self.rows.lock().unwrap().values().cloned().collect()
    }

    pub fn get(&self, id: &uuid::Uuid) -> Option<StoredJob> {
        self.rows.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn upsert(&self, job: &JobEntity) -> Result<()> {
        if self.failing_titles.lock().unwrap().contains(&job.title) {
            return Err(anyhow!("connection reset while writing {}", job.job_id));
        }
        self.insert_row(StoredJob::from(job));
        Ok(())
    }

    async fn list_by_status(&self, status: JobStatus) -> Result<Vec<StoredJob>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(anyhow!("pool timed out: password authentication failed"));
        }
        let mut rows: Vec<StoredJob> = self
            .rows()
            .into_iter()
            .filter(|r| r.status == status.as_str())
            .collect();
        rows.sort_by(|a, b| b.posted_date.cmp(&a.posted_date));
        Ok(rows)
    }
}

/// Replays queued responses in order, then falls back to `default`.
/// Records every prompt it receives.
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<String, String>>>,
    default: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn always(text: &str) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            default: text.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn then_text(self, text: &str) -> Self {
        self.responses.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn then_error(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(LlmError::Api {
                status: 503,
                message,
            }),
            None => Ok(self.default.clone()),
        }
    }
}
