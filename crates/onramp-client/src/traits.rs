/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Seams between the HTTP endpoints and the code that drives them.
//!
//! The resolver and the normalization pipeline only see these traits, so
//! tests can swap in scripted sources without a network.

use async_trait::async_trait;
use onramp_core::{CurrencyPair, QuoteRequest, Result};
use onramp_models::RawQuote;

/// Source of the reference market rate for a currency pair.
#[async_trait]
pub trait RateSource: Send + Sync {
  /// Fiat needed for one unit of crypto. Errors are classified with
  /// [`onramp_core::Error::is_rate_limit`] by the caller.
  async fn fiat_per_unit(&self, pair: &CurrencyPair) -> Result<f64>;
}

/// Source of ranked provider quotes for one request tuple.
#[async_trait]
pub trait QuoteSource: Send + Sync {
  /// Quotes in upstream order, ranked from 1. An empty vector is a normal
  /// answer; `Err` means the request itself failed.
  async fn fetch(&self, request: &QuoteRequest) -> Result<Vec<RawQuote>>;
}
