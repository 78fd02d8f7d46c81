//! Numeric coercion for dashboard input.
//!
//! Signal fields arrive from hand-filled admin forms, so a value may be a JSON
//! number, a numeric string, an empty string or missing entirely. Scoring must
//! never fail on those, so every signal field goes through [`lenient_number`].

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a JSON value as a number, the way a form field would be read.
///
/// Returns `None` when the value has no numeric reading (objects, arrays,
/// `null`, strings like `"abc"`, non-finite results). Blank strings read as 0.
pub fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Like [`parse_number`], but anything unreadable becomes 0.
pub fn coerce_number(value: &Value) -> f64 {
    parse_number(value).unwrap_or(0.0)
}

/// Serde adapter: `#[serde(default, deserialize_with = "lenient_number")]`.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_number).unwrap_or(0.0))
}
