//! Response normalizer: turns raw model output into an `AnalysisResult`.
//!
//! Models wrap their JSON in preamble, code fences or sign-offs despite being
//! told not to. Extraction takes the span from the first `{` to the last `}`
//! and parses it strictly. Every failure falls back to defaults; the returned
//! `Diagnosis` tells the caller which stage gave up.
//!
//! Known gaps, both ending up as `Diagnosis::InvalidJson` with every field
//! defaulted:
//! - a stray `}` in trailing commentary widens the span and breaks the parse;
//! - a number too large for `f64` (say `"verificationScore": 1e400`) rejects
//!   the whole object, so a usable `summary` and `category` are lost with it.

use serde_json::{Map, Value};

use crate::jobs::models::{AnalysisResult, DEFAULT_CATEGORY, DEFAULT_TEXT};

/// How far normalization got before settling on its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnosis {
    /// A JSON object was found and parsed. Individual fields may still be defaulted.
    Parsed,
    /// The model returned nothing but whitespace.
    EmptyOutput,
    /// No `{ ... }` span exists in the output.
    NoJsonBoundary,
    /// A span was found but is not a valid JSON object.
    InvalidJson(String),
}

impl Diagnosis {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Diagnosis::Parsed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub analysis: AnalysisResult,
    pub diagnosis: Diagnosis,
}

impl Normalized {
    fn defaulted(diagnosis: Diagnosis) -> Self {
        Self {
            analysis: AnalysisResult::default(),
            diagnosis,
        }
    }
}

/// Normalizes one model response. Never fails; `title` is only used for logging.
pub fn normalize(raw: &str, title: &str) -> Normalized {
    let text = raw.trim();
    if text.is_empty() {
        tracing::error!(job = %title, "No model output to parse for JSON");
        return Normalized::defaulted(Diagnosis::EmptyOutput);
    }

    let Some(span) = json_span(text) else {
        tracing::error!(
            job = %title,
            raw = %text,
            "Failed to find a complete JSON object in model output"
        );
        return Normalized::defaulted(Diagnosis::NoJsonBoundary);
    };

    match serde_json::from_str::<Map<String, Value>>(span) {
        Ok(object) => Normalized {
            analysis: analysis_from_object(&object),
            diagnosis: Diagnosis::Parsed,
        },
        Err(e) => {
            tracing::error!(
                job = %title,
                extracted = %span,
                "Failed to parse extracted JSON: {e}"
            );
            Normalized::defaulted(Diagnosis::InvalidJson(e.to_string()))
        }
    }
}

/// Inclusive slice from the first `{` to the last `}`, trimmed.
/// `None` if either brace is missing or they are out of order.
pub fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(text[start..=end].trim())
}

/// Reads each field on its own; a bad field never spoils the others.
fn analysis_from_object(object: &Map<String, Value>) -> AnalysisResult {
    AnalysisResult {
        summary: string_field(object, "summary", DEFAULT_TEXT),
        verification_score: object.get("verificationScore").map_or(0, score_value),
        flags: object.get("flags").map(flag_values).unwrap_or_default(),
        category: string_field(object, "category", DEFAULT_CATEGORY),
    }
}

fn string_field(object: &Map<String, Value>, key: &str, default: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

/// Integral numbers pass through, fractional ones truncate toward zero,
/// anything that is not a number clamps to 0.
fn score_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        _ => 0,
    }
}

fn flag_values(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
