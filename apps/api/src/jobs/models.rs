use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub const DEFAULT_TEXT: &str = "N/A";
pub const DEFAULT_CATEGORY: &str = "Other";
/// Scores strictly above this mark a posting as verified.
pub const VERIFIED_THRESHOLD: i64 = 60;

/// The fixed label set the model is asked to choose from. "Other" is the fallback.
pub const CATEGORIES: [&str; 19] = [
    "IT & Software",
    "Marketing",
    "Sales",
    "Healthcare",
    "Education",
    "Finance & Accounting",
    "Admin & HR",
    "Customer Service",
    "Hospitality",
    "Manufacturing",
    "Logistics & Supply Chain",
    "Construction",
    "Agriculture",
    "Creative Arts",
    "Legal",
    "Engineering",
    "Science & Research",
    "Trades & Manual Labor",
    DEFAULT_CATEGORY,
];

/// A scraped posting as it appears in the uploaded snapshot. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl JobPosting {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TEXT)
    }

    pub fn company(&self) -> &str {
        self.company.as_deref().unwrap_or(DEFAULT_TEXT)
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Deterministic identifier over the defaulted title and the raw url.
    pub fn job_id(&self) -> Uuid {
        job_id(self.title(), self.url.as_deref().unwrap_or(""))
    }

    /// Reads one snapshot entry without schema checks. Strings pass through,
    /// numbers and booleans are rendered as text, anything else counts as missing.
    /// `None` when the entry is not an object at all.
    pub fn from_entry(entry: &Value) -> Option<Self> {
        let object = entry.as_object()?;
        Some(Self {
            title: text_field(object, "title"),
            company: text_field(object, "company"),
            location: text_field(object, "location"),
            url: text_field(object, "url"),
            description: text_field(object, "description"),
        })
    }
}

fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// UUIDv5 in the DNS namespace over `title + url`. Same pair, same id, every time.
pub fn job_id(title: &str, url: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, format!("{title}{url}").as_bytes())
}

/// The four fields extracted from a model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub verification_score: i64,
    pub flags: Vec<String>,
    pub category: String,
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self {
            summary: DEFAULT_TEXT.to_string(),
            verification_score: 0,
            flags: Vec::new(),
            category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

impl AnalysisResult {
    pub fn is_verified(&self) -> bool {
        self.verification_score > VERIFIED_THRESHOLD
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    #[default]
    Active,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "ACTIVE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScamAnalysis {
    pub score: i64,
    pub flags: Vec<String>,
}

/// A posting merged with its analysis, ready for the job store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobEntity {
    pub job_id: Uuid,
    pub title: String,
    pub company: String,
    pub original_url: String,
    pub description: String,
    pub summary: String,
    pub is_verified: bool,
    pub scam_analysis: ScamAnalysis,
    pub category: String,
    /// Date of processing, not of the original posting. Reprocessing moves it forward.
    pub posted_date: NaiveDate,
    pub status: JobStatus,
}

impl JobEntity {
    pub fn from_analysis(posting: &JobPosting, analysis: AnalysisResult, posted_date: NaiveDate) -> Self {
        let is_verified = analysis.is_verified();
        Self {
            job_id: posting.job_id(),
            title: posting.title().to_string(),
            company: posting.company().to_string(),
            original_url: posting.url.clone().unwrap_or_else(|| DEFAULT_TEXT.to_string()),
            description: posting.description().to_string(),
            summary: analysis.summary,
            is_verified,
            scam_analysis: ScamAnalysis {
                score: analysis.verification_score,
                flags: analysis.flags,
            },
            category: analysis.category,
            posted_date,
            status: JobStatus::Active,
        }
    }
}
