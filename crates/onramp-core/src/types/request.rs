/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

use crate::error::{Error, Result};
use crate::types::asset::{CryptoAsset, CurrencyPair};
use serde::{Deserialize, Serialize};

/// Everything a single quote call needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
  region: String,
  fiat: String,
  amount: f64,
  payment_method: String,
  crypto: CryptoAsset,
}

impl QuoteRequest {
  /// Build a validated request. Text fields must be non-blank and the amount
  /// finite and positive.
  pub fn new(
    region: &str,
    fiat: &str,
    amount: f64,
    payment_method: &str,
    crypto: CryptoAsset,
  ) -> Result<Self> {
    let region = non_blank("region", region)?;
    let fiat = non_blank("fiat", fiat)?.to_uppercase();
    let payment_method = non_blank("payment method", payment_method)?;

    if !amount.is_finite() || amount <= 0.0 {
      return Err(Error::InvalidRequest(format!("amount must be positive, got {}", amount)));
    }

    Ok(Self { region, fiat, amount, payment_method, crypto })
  }

  pub fn region(&self) -> &str {
    &self.region
  }

  pub fn fiat(&self) -> &str {
    &self.fiat
  }

  pub fn amount(&self) -> f64 {
    self.amount
  }

  pub fn payment_method(&self) -> &str {
    &self.payment_method
  }

  pub fn crypto(&self) -> &CryptoAsset {
    &self.crypto
  }

  /// Rate cache key for this request
  pub fn pair(&self) -> CurrencyPair {
    CurrencyPair::new(self.crypto.clone(), &self.fiat)
  }
}

fn non_blank(field: &str, value: &str) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::InvalidRequest(format!("{} must not be empty", field)));
  }
  Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn eth() -> CryptoAsset {
    CryptoAsset::new(
      "ETH (Mainnet)",
      "/currencies/crypto/1/0x0000000000000000000000000000000000000000",
    )
    .unwrap()
  }

  #[test]
  fn test_new_request() {
    let req = QuoteRequest::new("de", "eur", 100.0, "sepa-bank-transfer", eth()).unwrap();
    assert_eq!(req.region(), "de");
    assert_eq!(req.fiat(), "EUR");
    assert_eq!(req.amount(), 100.0);
    assert_eq!(req.payment_method(), "sepa-bank-transfer");
    assert_eq!(req.pair(), CurrencyPair::new(eth(), "EUR"));
  }

  #[test]
  fn test_rejects_blank_fields() {
    assert!(QuoteRequest::new(" ", "EUR", 100.0, "paypal", eth()).is_err());
    assert!(QuoteRequest::new("de", "", 100.0, "paypal", eth()).is_err());
    assert!(QuoteRequest::new("de", "EUR", 100.0, "", eth()).is_err());
  }

  #[test]
  fn test_rejects_bad_amounts() {
    for amount in [0.0, -30.0, f64::NAN, f64::INFINITY] {
      let result = QuoteRequest::new("de", "EUR", amount, "paypal", eth());
      assert!(matches!(result, Err(Error::InvalidRequest(_))), "accepted {}", amount);
    }
  }
}
