/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Resolve, fetch, derive: one request tuple in, normalized records out.

use crate::metrics::MetricsDeriver;
use chrono::Utc;
use onramp_client::{OnRampClient, QuoteSource, RateResolver};
use onramp_core::{MarketRate, QuoteRequest};
use onramp_models::NormalizedRecord;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of one pipeline run.
///
/// A failed quote fetch is not fatal: `records` is empty and the cause is
/// kept in `fetch_failure` for the caller to count or log.
#[derive(Debug)]
pub struct PipelineOutput {
  pub records: Vec<NormalizedRecord>,
  pub rate: MarketRate,
  pub fetch_failure: Option<onramp_core::Error>,
}

impl PipelineOutput {
  pub fn is_failure(&self) -> bool {
    self.fetch_failure.is_some()
  }
}

/// Owns the per-run rate cache and the quote source.
pub struct NormalizationPipeline {
  resolver: RateResolver,
  quotes: Arc<dyn QuoteSource>,
}

impl NormalizationPipeline {
  pub fn new(resolver: RateResolver, quotes: Arc<dyn QuoteSource>) -> Self {
    Self { resolver, quotes }
  }

  /// Pipeline over a client's endpoints with a fresh rate cache
  pub fn from_client(client: &OnRampClient) -> Self {
    Self::new(client.rate_resolver(), Arc::new(client.quotes()))
  }

  pub async fn run(&mut self, request: &QuoteRequest) -> PipelineOutput {
    let rate = self.resolver.resolve(&request.pair()).await;

    let quotes = match self.quotes.fetch(request).await {
      Ok(quotes) => quotes,
      Err(e) => {
        warn!(
          "Error fetching quotes for {} {} {} via {}: {}",
          request.amount(),
          request.fiat(),
          request.crypto(),
          request.payment_method(),
          e
        );
        return PipelineOutput { records: Vec::new(), rate, fetch_failure: Some(e) };
      }
    };

    if quotes.is_empty() {
      debug!("No quotes for {} {} in {}", request.amount(), request.fiat(), request.region());
    }

    let generated_at = Utc::now();
    let records = quotes
      .into_iter()
      .map(|raw| {
        let derived = MetricsDeriver::derive(&raw, rate);
        NormalizedRecord::new(request, raw, rate, derived, generated_at)
      })
      .collect();

    PipelineOutput { records, rate, fetch_failure: None }
  }

  pub fn resolver(&self) -> &RateResolver {
    &self.resolver
  }
}
