/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference fiat cost of one unit of crypto, or the explicit failure marker.
///
/// `Resolved(0.0)` is a legitimate upstream answer that is simply unusable for
/// division; callers go through [`MarketRate::usable`] before dividing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MarketRate {
  Resolved(f64),
  Unresolved,
}

impl MarketRate {
  /// The rate if it is finite and strictly positive.
  pub fn usable(&self) -> Option<f64> {
    match *self {
      MarketRate::Resolved(v) if v.is_finite() && v > 0.0 => Some(v),
      _ => None,
    }
  }

  /// Raw value for reporting; `None` only for `Unresolved`.
  pub fn value(&self) -> Option<f64> {
    match *self {
      MarketRate::Resolved(v) => Some(v),
      MarketRate::Unresolved => None,
    }
  }

  pub fn is_resolved(&self) -> bool {
    matches!(self, MarketRate::Resolved(_))
  }
}

impl fmt::Display for MarketRate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MarketRate::Resolved(v) => write!(f, "{:.2}", v),
      MarketRate::Unresolved => write!(f, "unresolved"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_usable() {
    assert_eq!(MarketRate::Resolved(2000.0).usable(), Some(2000.0));
    assert_eq!(MarketRate::Resolved(0.0).usable(), None);
    assert_eq!(MarketRate::Resolved(-1.0).usable(), None);
    assert_eq!(MarketRate::Resolved(f64::NAN).usable(), None);
    assert_eq!(MarketRate::Resolved(f64::INFINITY).usable(), None);
    assert_eq!(MarketRate::Unresolved.usable(), None);
  }

  #[test]
  fn test_value_keeps_zero() {
    assert_eq!(MarketRate::Resolved(0.0).value(), Some(0.0));
    assert!(MarketRate::Resolved(0.0).is_resolved());
    assert_eq!(MarketRate::Unresolved.value(), None);
  }

  #[test]
  fn test_display() {
    assert_eq!(MarketRate::Resolved(3012.456).to_string(), "3012.46");
    assert_eq!(MarketRate::Unresolved.to_string(), "unresolved");
  }
}
