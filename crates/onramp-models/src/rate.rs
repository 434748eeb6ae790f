/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Reference rate endpoint response

use onramp_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `/currencies/crypto/{chain}/{token}/amount?value=1`.
///
/// Only `value` matters; other keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateAmountResponse {
  #[serde(default)]
  pub value: Option<Value>,
}

impl RateAmountResponse {
  /// Fiat needed for one unit of crypto.
  ///
  /// Absent or null `value` is `0.0` (valid but unusable). A value that is
  /// neither a number nor a numeric string is a parse error.
  pub fn fiat_per_unit(&self) -> Result<f64> {
    match &self.value {
      None | Some(Value::Null) => Ok(0.0),
      Some(Value::Number(n)) => {
        n.as_f64().ok_or_else(|| Error::Parse(format!("rate value {} is not an f64", n)))
      }
      Some(Value::String(s)) => {
        s.trim()
          .parse::<f64>()
          .map_err(|_| Error::Parse(format!("rate value {:?} is not numeric", s)))
      }
      Some(other) => Err(Error::Parse(format!("unexpected rate value: {}", other))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(body: &str) -> RateAmountResponse {
    serde_json::from_str(body).unwrap()
  }

  #[test]
  fn test_numeric_value() {
    let resp = parse(r#"{"value": 2034.17, "fiat": "/currencies/fiat/eur"}"#);
    assert_eq!(resp.fiat_per_unit().unwrap(), 2034.17);
  }

  #[test]
  fn test_string_value() {
    assert_eq!(parse(r#"{"value": "0.92"}"#).fiat_per_unit().unwrap(), 0.92);
  }

  #[test]
  fn test_missing_or_null_value_is_zero() {
    assert_eq!(parse("{}").fiat_per_unit().unwrap(), 0.0);
    assert_eq!(parse(r#"{"value": null}"#).fiat_per_unit().unwrap(), 0.0);
  }

  #[test]
  fn test_garbage_value_is_parse_error() {
    assert!(matches!(parse(r#"{"value": "lots"}"#).fiat_per_unit(), Err(Error::Parse(_))));
    assert!(matches!(parse(r#"{"value": [1]}"#).fiat_per_unit(), Err(Error::Parse(_))));
  }
}
