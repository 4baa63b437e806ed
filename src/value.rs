//! Typed values and the storage codec
//!
//! Application values carry an explicit type tag from a closed set and are
//! serialized into a stable on-wire byte form. Integers (and floats with no
//! fractional part) are stored as plain decimal text so a numeric read
//! succeeds without the generic decoder; everything else goes through a
//! self-describing binary encoding.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An application value tagged with its storage interpretation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// UTF-8 string
    Str(String),
    /// Boolean
    Bool(bool),
    /// Signed 64-bit integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// Calendar date
    Date(NaiveDate),
    /// Timestamp with second precision or better
    Timestamp(DateTime<Utc>),
    /// Structured JSON document
    Json(#[serde(with = "json_text")] serde_json::Value),
    /// Opaque binary blob
    Bytes(Vec<u8>),
}

impl Value {
    /// Get the name of this value's type tag
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Date(_) => "date",
            Self::Timestamp(_) => "timestamp",
            Self::Json(_) => "json",
            Self::Bytes(_) => "bytes",
        }
    }
}

/// Encode a value into its on-wire byte form
///
/// Integers and integral floats become decimal text; an integral float is
/// collapsed to the integer it equals, so `Float(4.0)` decodes back as
/// `Int(4)`. All other values use the generic binary encoding.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::Int(n) => Ok(n.to_string().into_bytes()),
        Value::Float(f) if is_integral(*f) => Ok((*f as i64).to_string().into_bytes()),
        other => bincode::serialize(other).map_err(|e| Error::encode(e.to_string())),
    }
}

/// Decode an on-wire byte form back into a value
///
/// Attempts an integer parse of the raw bytes first, then falls back to the
/// generic binary decoding.
pub fn decode(bytes: &[u8]) -> Result<Value> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Value::Int(n));
        }
    }
    bincode::deserialize(bytes).map_err(|e| Error::decode(e.to_string()))
}

/// Whether a float carries no information beyond an i64
///
/// The upper bound is strict: `i64::MAX as f64` rounds up to 2^63, which
/// does not fit an i64, and casting it would saturate and change the
/// numeric value. Out-of-range integral floats ride the generic encoding
/// instead. `i64::MIN as f64` is exactly -2^63 and is in range.
fn is_integral(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

/// JSON documents ride the binary encoding as their compact text form,
/// since the generic decoder cannot reconstruct arbitrary self-describing
/// structures.
mod json_text {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &serde_json::Value, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<serde_json::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_integer_stored_as_plain_text() {
        let encoded = encode(&Value::Int(42)).unwrap();
        assert_eq!(encoded, b"42");
        assert_eq!(decode(&encoded).unwrap(), Value::Int(42));

        let encoded = encode(&Value::Int(-17)).unwrap();
        assert_eq!(encoded, b"-17");
        assert_eq!(decode(&encoded).unwrap(), Value::Int(-17));
    }

    #[test]
    fn test_integral_float_collapses_to_integer() {
        // Intentional behavior: a float with no fractional part loses the
        // float/int distinction on round-trip.
        let encoded = encode(&Value::Float(4.0)).unwrap();
        assert_eq!(encoded, b"4");
        assert_eq!(decode(&encoded).unwrap(), Value::Int(4));
    }

    #[test]
    fn test_fractional_float_round_trip() {
        let encoded = encode(&Value::Float(3.25)).unwrap();
        assert_eq!(decode(&encoded).unwrap(), Value::Float(3.25));
    }

    #[test]
    fn test_integral_float_collapse_at_the_i64_boundary() {
        // 2^63 has no fractional part but does not fit an i64; it must not
        // be collapsed, or its numeric value would silently change.
        let value = Value::Float(9223372036854775808.0);
        let encoded = encode(&value).unwrap();
        assert_eq!(decode(&encoded).unwrap(), value);

        // The largest integral double below 2^63 still collapses.
        let encoded = encode(&Value::Float(9223372036854774784.0)).unwrap();
        assert_eq!(decode(&encoded).unwrap(), Value::Int(9223372036854774784));

        // -2^63 is exactly i64::MIN and collapses.
        let encoded = encode(&Value::Float(i64::MIN as f64)).unwrap();
        assert_eq!(decode(&encoded).unwrap(), Value::Int(i64::MIN));
    }

    #[test]
    fn test_non_finite_floats_take_generic_path() {
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let encoded = encode(&Value::Float(f)).unwrap();
            match decode(&encoded).unwrap() {
                Value::Float(decoded) => {
                    assert_eq!(decoded.is_nan(), f.is_nan());
                    if !f.is_nan() {
                        assert_eq!(decoded, f);
                    }
                }
                other => panic!("expected float, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_string_round_trip() {
        let value = Value::Str("hello".to_string());
        assert_eq!(decode(&encode(&value).unwrap()).unwrap(), value);

        // A numeric-looking string keeps its tag: only Int and integral
        // Float take the plain-text fast path.
        let value = Value::Str("42".to_string());
        assert_eq!(decode(&encode(&value).unwrap()).unwrap(), value);
    }

    #[test]
    fn test_bool_round_trip() {
        for b in [true, false] {
            let value = Value::Bool(b);
            assert_eq!(decode(&encode(&value).unwrap()).unwrap(), value);
        }
    }

    #[test]
    fn test_date_and_timestamp_round_trip() {
        let date = Value::Date(NaiveDate::from_ymd_opt(2019, 7, 14).unwrap());
        assert_eq!(decode(&encode(&date).unwrap()).unwrap(), date);

        let ts = Value::Timestamp(Utc.with_ymd_and_hms(2019, 7, 14, 10, 30, 0).unwrap());
        assert_eq!(decode(&encode(&ts).unwrap()).unwrap(), ts);
    }

    #[test]
    fn test_json_round_trip() {
        let value = Value::Json(serde_json::json!({
            "name": "session",
            "count": 3,
            "tags": ["a", "b"]
        }));
        assert_eq!(decode(&encode(&value).unwrap()).unwrap(), value);
    }

    #[test]
    fn test_bytes_round_trip() {
        let value = Value::Bytes(vec![0, 159, 146, 150]);
        assert_eq!(decode(&encode(&value).unwrap()).unwrap(), value);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode(b"abc").unwrap_err();
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Int(1).type_name(), "integer");
        assert_eq!(Value::Str(String::new()).type_name(), "string");
        assert_eq!(Value::Bytes(vec![]).type_name(), "bytes");
    }
}
