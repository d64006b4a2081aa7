//! Object-store write notifications (S3 event format).

use serde_json::Value;

use crate::errors::AppError;

/// The bucket and decoded key of the object that triggered processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    /// Reads `Records[0].s3.bucket.name` and `Records[0].s3.object.key`.
    /// Anything missing or mistyped is a malformed event.
    pub fn from_event(event: &Value) -> Result<Self, AppError> {
        let record = event
            .get("Records")
            .and_then(Value::as_array)
            .ok_or_else(|| missing("Records"))?
            .first()
            .ok_or_else(|| missing("Records[0]"))?;

        let bucket = record
            .pointer("/s3/bucket/name")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("Records[0].s3.bucket.name"))?;
        let raw_key = record
            .pointer("/s3/object/key")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("Records[0].s3.object.key"))?;

        Ok(Self {
            bucket: bucket.to_string(),
            key: decode_object_key(raw_key)?,
        })
    }
}

/// S3 notifications form-encode keys: `+` is a space, everything else is percent-encoded.
pub fn decode_object_key(raw: &str) -> Result<String, AppError> {
    urlencoding::decode(&raw.replace('+', " "))
        .map(|key| key.into_owned())
        .map_err(|e| AppError::Validation(format!("Malformed event. Object key is not valid UTF-8: {e}")))
}

fn missing(path: &str) -> AppError {
    AppError::Validation(format!(
        "Malformed event. Missing key: {path}. Check the object storage notification configuration."
    ))
}
