//! Field extraction helpers shared by the response models

use serde_json::Value;

/// Read a numeric field that may arrive as a JSON number or a numeric string.
/// Anything else (missing, null, bool, garbage text, non-finite) is `None`.
pub fn lenient_f64(value: Option<&Value>) -> Option<f64> {
  let parsed = match value? {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  };
  parsed.filter(|v| v.is_finite())
}

/// Fee fields default to zero when the provider leaves them out.
pub fn fee_or_zero(value: Option<&Value>) -> f64 {
  lenient_f64(value).unwrap_or(0.0)
}

/// Read a string field, ignoring blank values.
pub fn non_empty_str(value: Option<&Value>) -> Option<String> {
  value.and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}
