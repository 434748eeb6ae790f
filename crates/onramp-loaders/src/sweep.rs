/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Sweep driver: walks the amount × asset × region × payment method grid,
//! runs the pipeline per tuple and appends one batch per region to the sink.

use crate::pipeline::{NormalizationPipeline, PipelineOutput};
use crate::sink::RecordSink;
use crate::{LoaderError, LoaderResult};
use onramp_core::{CryptoAsset, CurrencyPair, QuoteRequest};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, warn};

/// One region with its fiat and the payment methods to query there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionPlan {
  pub code: String,
  pub fiat: String,
  pub payment_methods: Vec<String>,
}

impl RegionPlan {
  pub fn new(code: &str, fiat: &str, payment_methods: &[&str]) -> Self {
    Self {
      code: code.to_string(),
      fiat: fiat.to_string(),
      payment_methods: payment_methods.iter().map(|m| m.to_string()).collect(),
    }
  }
}

/// The parameter grid of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPlan {
  pub amounts: Vec<f64>,
  pub assets: Vec<CryptoAsset>,
  pub regions: Vec<RegionPlan>,
}

/// 30, then 100 to 29100 in steps of 1000
pub fn default_amounts() -> Vec<f64> {
  std::iter::once(30.0).chain((100..30_000).step_by(1000).map(f64::from)).collect()
}

impl Default for SweepPlan {
  fn default() -> Self {
    let assets = [
      ("ETH (Mainnet)", "/currencies/crypto/1/0x0000000000000000000000000000000000000000"),
      ("USDT (Ethereum)", "/currencies/crypto/1/0xdac17f958d2ee523a2206206994597c13d831ec7"),
      ("USDT (BNB Chain)", "/currencies/crypto/56/0x55d398326f99059ff775485246999027b3197955"),
    ]
    .into_iter()
    .filter_map(|(label, id)| CryptoAsset::new(label, id).ok())
    .collect();

    Self {
      amounts: default_amounts(),
      assets,
      regions: vec![
        RegionPlan::new(
          "de",
          "EUR",
          &["sepa-bank-transfer", "rev-pay", "debit-credit-card", "paypal", "binance-p2p"],
        ),
        RegionPlan::new(
          "gb",
          "GBP",
          &["debit-credit-card", "gbp-bank-transfer", "rev-pay", "paypal"],
        ),
        RegionPlan::new(
          "us-va",
          "USD",
          &["venmo", "debit-credit-card", "paypal", "instant-bank-transfer"],
        ),
      ],
    }
  }
}

impl SweepPlan {
  pub fn from_json_file<P: AsRef<Path>>(path: P) -> LoaderResult<Self> {
    let text = fs::read_to_string(path.as_ref())?;
    let plan: SweepPlan = serde_json::from_str(&text)?;
    plan.validate()?;
    Ok(plan)
  }

  pub fn with_amounts(mut self, amounts: Vec<f64>) -> Self {
    self.amounts = amounts;
    self
  }

  /// Reject plans that would produce no work or invalid requests
  pub fn validate(&self) -> LoaderResult<()> {
    if self.amounts.is_empty() || self.assets.is_empty() || self.regions.is_empty() {
      return Err(LoaderError::InvalidData(
        "sweep plan needs at least one amount, asset and region".to_string(),
      ));
    }
    if let Some(bad) = self.amounts.iter().find(|a| !a.is_finite() || **a <= 0.0) {
      return Err(LoaderError::InvalidData(format!("amount must be positive, got {}", bad)));
    }
    for region in &self.regions {
      if region.code.trim().is_empty() || region.fiat.trim().is_empty() {
        return Err(LoaderError::InvalidData("region code and fiat must be set".to_string()));
      }
      if region.payment_methods.iter().any(|m| m.trim().is_empty()) {
        return Err(LoaderError::InvalidData(format!(
          "blank payment method in region {}",
          region.code
        )));
      }
    }
    Ok(())
  }

  /// Number of pipeline runs the plan expands to
  pub fn combinations(&self) -> usize {
    let methods: usize = self.regions.iter().map(|r| r.payment_methods.len()).sum();
    self.amounts.len() * self.assets.len() * methods
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepStats {
  pub combinations: usize,
  pub records_written: usize,
  pub fetch_failures: usize,
  /// Distinct pairs that never got a usable rate
  pub unresolved_rates: usize,
  pub sink_failures: usize,
  pub elapsed_ms: u128,
}

pub async fn run_sweep(
  pipeline: &mut NormalizationPipeline,
  plan: &SweepPlan,
  sink: &mut dyn RecordSink,
) -> LoaderResult<SweepStats> {
  run_sweep_with_progress(pipeline, plan, sink, |_, _| {}).await
}

/// Like [`run_sweep`], calling `on_tuple` after every pipeline run
pub async fn run_sweep_with_progress<F>(
  pipeline: &mut NormalizationPipeline,
  plan: &SweepPlan,
  sink: &mut dyn RecordSink,
  mut on_tuple: F,
) -> LoaderResult<SweepStats>
where
  F: FnMut(&QuoteRequest, &PipelineOutput),
{
  plan.validate()?;

  let started = Instant::now();
  let mut stats = SweepStats::default();
  let mut unusable: HashSet<CurrencyPair> = HashSet::new();

  info!("Starting sweep over {} combinations", plan.combinations());

  for &amount in &plan.amounts {
    info!("Fetching quotes for amount: {}", amount);
    for asset in &plan.assets {
      for region in &plan.regions {
        let mut batch = Vec::new();

        for method in &region.payment_methods {
          let request =
            QuoteRequest::new(&region.code, &region.fiat, amount, method, asset.clone())?;
          let output = pipeline.run(&request).await;
          stats.combinations += 1;

          if output.rate.usable().is_none() {
            unusable.insert(request.pair());
          }
          if output.is_failure() {
            stats.fetch_failures += 1;
          }
          on_tuple(&request, &output);
          batch.extend(output.records);
        }

        if batch.is_empty() {
          continue;
        }
        match sink.append(&batch) {
          Ok(written) => stats.records_written += written,
          Err(e) => {
            error!(
              "Failed to write {} rows for {} in {} at {}: {}",
              batch.len(),
              asset,
              region.code,
              amount,
              e
            );
            stats.sink_failures += 1;
          }
        }
      }
    }
  }

  stats.unresolved_rates = unusable.len();
  stats.elapsed_ms = started.elapsed().as_millis();

  if stats.fetch_failures > 0 || stats.sink_failures > 0 {
    warn!(
      "Sweep finished with {} fetch failures and {} sink failures",
      stats.fetch_failures, stats.sink_failures
    );
  }
  info!(
    "Sweep complete: {} combinations, {} records in {}ms",
    stats.combinations, stats.records_written, stats.elapsed_ms
  );
  Ok(stats)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sink::MemorySink;
  use async_trait::async_trait;
  use onramp_client::{QuoteSource, RateResolver, RateSource, RetryPolicy};
  use onramp_core::{Error, Result};
  use onramp_models::{NormalizedRecord, RawQuote};
  use std::sync::{Arc, Mutex};
  use std::time::Duration;

  struct PerFiatRate;

  #[async_trait]
  impl RateSource for PerFiatRate {
    async fn fiat_per_unit(&self, pair: &CurrencyPair) -> Result<f64> {
      match pair.fiat() {
        "EUR" => Ok(2000.0),
        "GBP" => Ok(0.0),
        _ => Err(Error::Http("connection refused".to_string())),
      }
    }
  }

  /// Two quotes per call, except `paypal` which fails; records every request seen.
  #[derive(Default)]
  struct RecordingQuotes {
    seen: Mutex<Vec<(f64, String, String)>>,
  }

  #[async_trait]
  impl QuoteSource for RecordingQuotes {
    async fn fetch(&self, request: &QuoteRequest) -> Result<Vec<RawQuote>> {
      self.seen.lock().unwrap().push((
        request.amount(),
        request.region().to_string(),
        request.payment_method().to_string(),
      ));
      if request.payment_method() == "paypal" {
        return Err(Error::HttpStatus { status: 500, url: "/providers/all/quote".to_string() });
      }
      Ok(
        ["Banxa", "MoonPay"]
          .iter()
          .enumerate()
          .map(|(i, name)| RawQuote {
            provider: name.to_string(),
            rank: i as u32 + 1,
            amount_in: Some(request.amount()),
            amount_out: Some(0.01),
            exchange_rate: None,
            network_fee: 1.0,
            provider_fee: 2.0,
            extra_fee: 0.0,
          })
          .collect(),
      )
    }
  }

  struct FailingSink;

  impl RecordSink for FailingSink {
    fn append(&mut self, _rows: &[NormalizedRecord]) -> LoaderResult<usize> {
      Err(LoaderError::IoError("disk full".to_string()))
    }
  }

  fn small_plan() -> SweepPlan {
    let eth = CryptoAsset::new(
      "ETH (Mainnet)",
      "/currencies/crypto/1/0x0000000000000000000000000000000000000000",
    )
    .unwrap();
    SweepPlan {
      amounts: vec![30.0, 1100.0],
      assets: vec![eth],
      regions: vec![
        RegionPlan::new("de", "EUR", &["sepa-bank-transfer", "paypal"]),
        RegionPlan::new("gb", "GBP", &["paypal"]),
        RegionPlan::new("us-va", "USD", &["venmo"]),
      ],
    }
  }

  fn pipeline(quotes: Arc<RecordingQuotes>) -> NormalizationPipeline {
    let policy = RetryPolicy { max_attempts: 3, base_delay: Duration::from_millis(1) };
    NormalizationPipeline::new(RateResolver::new(Arc::new(PerFiatRate), policy), quotes)
  }

  #[test]
  fn test_default_plan() {
    let plan = SweepPlan::default();
    assert_eq!(plan.amounts.len(), 31);
    assert_eq!(plan.amounts[0], 30.0);
    assert_eq!(plan.amounts[1], 100.0);
    assert_eq!(plan.amounts[2], 1100.0);
    assert_eq!(*plan.amounts.last().unwrap(), 29100.0);
    assert_eq!(plan.assets.len(), 3);
    assert_eq!(plan.assets[2].chain_id(), "56");
    assert_eq!(plan.regions.len(), 3);
    assert_eq!(plan.combinations(), 31 * 3 * 13);
    assert!(plan.validate().is_ok());
  }

  #[test]
  fn test_plan_json_round_trip() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("plan.json");
    let json = r#"{
      "amounts": [250, 7500],
      "assets": [{
        "label": "USDT (Ethereum)",
        "id": "/currencies/crypto/1/0xdac17f958d2ee523a2206206994597c13d831ec7"
      }],
      "regions": [{"code": "gb", "fiat": "GBP", "payment_methods": ["gbp-bank-transfer"]}]
    }"#;
    std::fs::write(&path, json).unwrap();

    let plan = SweepPlan::from_json_file(&path).unwrap();
    assert_eq!(plan.amounts, vec![250.0, 7500.0]);
    assert_eq!(plan.assets[0].token_address(), "0xdac17f958d2ee523a2206206994597c13d831ec7");
    assert_eq!(plan.combinations(), 2);
  }

  #[test]
  fn test_plan_rejects_bad_identifier() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("plan.json");
    let json =
      r#"{"amounts": [100], "assets": [{"label": "X", "id": "/tokens/1"}], "regions": []}"#;
    std::fs::write(&path, json).unwrap();
    assert!(matches!(SweepPlan::from_json_file(&path), Err(LoaderError::SerializationError(_))));
  }

  #[test]
  fn test_plan_validation() {
    assert!(SweepPlan::default().with_amounts(vec![]).validate().is_err());
    assert!(SweepPlan::default().with_amounts(vec![100.0, -5.0]).validate().is_err());
    let mut plan = SweepPlan::default();
    plan.regions[0].payment_methods.push("  ".to_string());
    assert!(plan.validate().is_err());
  }

  #[tokio::test]
  async fn test_iteration_order_and_batches() {
    let quotes = Arc::new(RecordingQuotes::default());
    let mut pipeline = pipeline(quotes.clone());
    let mut sink = MemorySink::new();

    let stats = run_sweep(&mut pipeline, &small_plan(), &mut sink).await.unwrap();

    let seen = quotes.seen.lock().unwrap().clone();
    let order: Vec<(f64, &str, &str)> =
      seen.iter().map(|(a, r, m)| (*a, r.as_str(), m.as_str())).collect();
    assert_eq!(
      order,
      vec![
        (30.0, "de", "sepa-bank-transfer"),
        (30.0, "de", "paypal"),
        (30.0, "gb", "paypal"),
        (30.0, "us-va", "venmo"),
        (1100.0, "de", "sepa-bank-transfer"),
        (1100.0, "de", "paypal"),
        (1100.0, "gb", "paypal"),
        (1100.0, "us-va", "venmo"),
      ]
    );

    assert_eq!(stats.combinations, 8);
    assert_eq!(stats.fetch_failures, 4);
    assert_eq!(stats.records_written, 8);
    // gb only has the failing method, so its batches are skipped
    assert_eq!(sink.batches(), 4);
    // GBP resolves to 0, USD fails outright
    assert_eq!(stats.unresolved_rates, 2);
    assert_eq!(stats.sink_failures, 0);
  }

  #[tokio::test]
  async fn test_sink_failure_is_counted() {
    let quotes = Arc::new(RecordingQuotes::default());
    let mut pipeline = pipeline(quotes);

    let stats = run_sweep(&mut pipeline, &small_plan(), &mut FailingSink).await.unwrap();
    assert_eq!(stats.combinations, 8);
    assert_eq!(stats.records_written, 0);
    assert_eq!(stats.sink_failures, 4);
  }

  #[tokio::test]
  async fn test_progress_callback() {
    let quotes = Arc::new(RecordingQuotes::default());
    let mut pipeline = pipeline(quotes);
    let mut sink = MemorySink::new();
    let mut ticks = 0;

    run_sweep_with_progress(&mut pipeline, &small_plan(), &mut sink, |_, _| ticks += 1)
      .await
      .unwrap();
    assert_eq!(ticks, 8);
  }

  #[tokio::test]
  async fn test_records_carry_region_context() {
    let quotes = Arc::new(RecordingQuotes::default());
    let mut pipeline = pipeline(quotes);
    let mut sink = MemorySink::new();
    run_sweep(&mut pipeline, &small_plan(), &mut sink).await.unwrap();

    let usd: Vec<_> = sink.rows().iter().filter(|r| r.region == "US-VA").collect();
    assert_eq!(usd.len(), 4);
    assert!(usd.iter().all(|r| r.market_rate.is_none() && r.spread == 0.0));
    let eur = sink.rows().iter().find(|r| r.region == "DE").unwrap();
    assert_eq!(eur.market_rate, Some(2000.0));
  }
}
