/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Derived metrics and the normalized row written to sinks.

use crate::quote::RawQuote;
use chrono::{DateTime, Utc};
use onramp_core::{MarketRate, QuoteRequest};
use serde::{Deserialize, Serialize};

/// Metrics computed from one quote and the reference market rate.
///
/// Every field is a plain number; the degraded path fills zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedFields {
  /// Crypto the buyer would get at market rate after explicit fees
  pub expected_amount_out: f64,
  /// Expected minus quoted crypto amount
  pub spread: f64,
  pub spread_percentage: f64,
  /// Spread converted back to fiat at market rate
  pub spread_in_fiat: f64,
  pub total_explicit_fee: f64,
  pub total_fee_including_spread: f64,
  pub total_fee_percentage: f64,
}

/// One provider quote with request context and derived metrics.
///
/// Field order and names match the sink schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NormalizedRecord {
  pub timestamp: DateTime<Utc>,
  pub amount: f64,
  pub fiat_currency: String,
  pub crypto_currency: String,
  pub region: String,
  pub payment_method: String,
  pub provider: String,
  pub rank: u32,
  pub amount_out: Option<f64>,
  pub exchange_rate: Option<f64>,
  pub market_rate: Option<f64>,
  pub expected_amount_out: f64,
  pub spread: f64,
  pub spread_percentage: f64,
  pub network_fee: f64,
  pub provider_fee: f64,
  pub extra_fee: f64,
  pub total_explicit_fee: f64,
  pub total_fee_including_spread: f64,
  pub total_fee_percentage: f64,
}

impl NormalizedRecord {
  /// Assemble a record. `Amount` is the provider's `amountIn`, or the
  /// requested amount when the provider left it out.
  pub fn new(
    request: &QuoteRequest,
    raw: RawQuote,
    rate: MarketRate,
    derived: DerivedFields,
    timestamp: DateTime<Utc>,
  ) -> Self {
    Self {
      timestamp,
      amount: raw.amount_in.unwrap_or(request.amount()),
      fiat_currency: request.fiat().to_string(),
      crypto_currency: request.crypto().label().to_string(),
      region: request.region().to_uppercase(),
      payment_method: request.payment_method().to_string(),
      provider: raw.provider,
      rank: raw.rank,
      amount_out: raw.amount_out,
      exchange_rate: raw.exchange_rate,
      market_rate: rate.value(),
      expected_amount_out: derived.expected_amount_out,
      spread: derived.spread,
      spread_percentage: derived.spread_percentage,
      network_fee: raw.network_fee,
      provider_fee: raw.provider_fee,
      extra_fee: raw.extra_fee,
      total_explicit_fee: derived.total_explicit_fee,
      total_fee_including_spread: derived.total_fee_including_spread,
      total_fee_percentage: derived.total_fee_percentage,
    }
  }
}
