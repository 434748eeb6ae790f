//! Aggregates normalized records into per-provider summaries by price bin.

use crate::LoaderResult;
use csv::Reader;
use onramp_models::NormalizedRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Half-open amount ranges used to bucket quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PriceBin {
  Low,
  Medium,
  High,
}

impl PriceBin {
  pub const ALL: [PriceBin; 3] = [PriceBin::Low, PriceBin::Medium, PriceBin::High];

  /// `[0,500)`, `[500,5000)`, `[5000,30001)`; anything else has no bin.
  pub fn from_amount(amount: f64) -> Option<Self> {
    match amount {
      a if (0.0..500.0).contains(&a) => Some(PriceBin::Low),
      a if (500.0..5000.0).contains(&a) => Some(PriceBin::Medium),
      a if (5000.0..30001.0).contains(&a) => Some(PriceBin::High),
      _ => None,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      PriceBin::Low => "Low (0-499)",
      PriceBin::Medium => "Medium (500-4999)",
      PriceBin::High => "High (5k+)",
    }
  }
}

impl fmt::Display for PriceBin {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// Averages for one (crypto, region, bin, provider) group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSummary {
  pub crypto: String,
  pub region: String,
  pub bin: PriceBin,
  pub provider: String,
  pub count: usize,
  pub avg_rank: f64,
  pub avg_fee_percentage: f64,
  pub avg_spread_percentage: f64,
}

#[derive(Default)]
struct Totals {
  count: usize,
  rank: f64,
  fee_percentage: f64,
  spread_percentage: f64,
}

/// Group and average. Sorted by crypto, region, bin, then best average rank.
pub fn summarize(records: &[NormalizedRecord]) -> Vec<ProviderSummary> {
  let mut groups: BTreeMap<(String, String, PriceBin, String), Totals> = BTreeMap::new();
  let mut skipped = 0usize;

  for rec in records {
    let Some(bin) = PriceBin::from_amount(rec.amount) else {
      skipped += 1;
      continue;
    };
    let key = (rec.crypto_currency.clone(), rec.region.clone(), bin, rec.provider.clone());
    let totals = groups.entry(key).or_default();
    totals.count += 1;
    totals.rank += f64::from(rec.rank);
    totals.fee_percentage += rec.total_fee_percentage;
    totals.spread_percentage += rec.spread_percentage;
  }

  if skipped > 0 {
    debug!("{} records outside every price bin", skipped);
  }

  let mut summaries: Vec<ProviderSummary> = groups
    .into_iter()
    .map(|((crypto, region, bin, provider), t)| {
      let n = t.count as f64;
      ProviderSummary {
        crypto,
        region,
        bin,
        provider,
        count: t.count,
        avg_rank: t.rank / n,
        avg_fee_percentage: t.fee_percentage / n,
        avg_spread_percentage: t.spread_percentage / n,
      }
    })
    .collect();

  summaries.sort_by(|a, b| {
    (&a.crypto, &a.region, a.bin)
      .cmp(&(&b.crypto, &b.region, b.bin))
      .then(a.avg_rank.total_cmp(&b.avg_rank))
      .then_with(|| a.provider.cmp(&b.provider))
  });
  summaries
}

/// Load rows written by [`crate::sink::CsvSink`]
pub fn read_csv<P: AsRef<Path>>(path: P) -> LoaderResult<Vec<NormalizedRecord>> {
  let mut reader = Reader::from_path(path.as_ref())?;
  let mut records = Vec::new();
  for row in reader.deserialize() {
    records.push(row?);
  }
  debug!("Loaded {} records from {}", records.len(), path.as_ref().display());
  Ok(records)
}
