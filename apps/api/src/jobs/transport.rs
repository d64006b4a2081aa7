//! Serialization adapter for numbers coming back from the job store.
//!
//! Scores are stored as `NUMERIC` and read as `Decimal`. Clients expect plain
//! JSON numbers: integral values go out as integers, the rest as floats.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serializer;

/// `serialize_with` hook for `Decimal` fields.
pub fn serialize_decimal<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract().is_zero() {
        if let Some(i) = value.to_i64() {
            return serializer.serialize_i64(i);
        }
    }
    match value.to_f64() {
        Some(f) => serializer.serialize_f64(f),
        None => serializer.serialize_none(),
    }
}
