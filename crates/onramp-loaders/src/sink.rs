//! Append-only destinations for normalized record batches.

use crate::LoaderResult;
use csv::WriterBuilder;
use onramp_models::NormalizedRecord;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Destination for record batches. Each call appends; nothing is rewritten.
pub trait RecordSink {
  /// Append `rows`, returning how many were written
  fn append(&mut self, rows: &[NormalizedRecord]) -> LoaderResult<usize>;
}

/// CSV file sink using the record's column names as the header.
///
/// The header is written only when the file is new or empty, so repeated
/// sweeps keep appending to one table.
#[derive(Debug)]
pub struct CsvSink {
  path: PathBuf,
}

impl CsvSink {
  pub fn new<P: AsRef<Path>>(path: P) -> Self {
    Self { path: path.as_ref().to_path_buf() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl RecordSink for CsvSink {
  fn append(&mut self, rows: &[NormalizedRecord]) -> LoaderResult<usize> {
    if rows.is_empty() {
      return Ok(0);
    }

    let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
    let write_header = file.metadata()?.len() == 0;
    if write_header {
      debug!("Writing CSV header to {}", self.path.display());
    }

    let mut writer = WriterBuilder::new().has_headers(write_header).from_writer(file);
    for row in rows {
      writer.serialize(row)?;
    }
    writer.flush()?;

    info!("Appended {} rows to {}", rows.len(), self.path.display());
    Ok(rows.len())
  }
}

/// Collects rows in memory
#[derive(Debug, Default)]
pub struct MemorySink {
  rows: Vec<NormalizedRecord>,
  batches: usize,
}

impl MemorySink {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn rows(&self) -> &[NormalizedRecord] {
    &self.rows
  }

  /// Number of non-empty appends received
  pub fn batches(&self) -> usize {
    self.batches
  }

  pub fn into_rows(self) -> Vec<NormalizedRecord> {
    self.rows
  }
}

impl RecordSink for MemorySink {
  fn append(&mut self, rows: &[NormalizedRecord]) -> LoaderResult<usize> {
    if !rows.is_empty() {
      self.batches += 1;
      self.rows.extend_from_slice(rows);
    }
    Ok(rows.len())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{TimeZone, Utc};
  use onramp_core::{CryptoAsset, MarketRate, QuoteRequest};
  use onramp_models::{DerivedFields, RawQuote};
  use tempfile::TempDir;

  fn record(provider: &str, rank: u32, rate: MarketRate) -> NormalizedRecord {
    let usdt = CryptoAsset::new(
      "USDT (BNB Chain)",
      "/currencies/crypto/56/0x55d398326f99059ff775485246999027b3197955",
    )
    .unwrap();
    let request = QuoteRequest::new("gb", "GBP", 500.0, "paypal", usdt).unwrap();
    let raw = RawQuote {
      provider: provider.to_string(),
      rank,
      amount_in: Some(500.0),
      amount_out: Some(620.4),
      exchange_rate: Some(0.79),
      network_fee: 0.3,
      provider_fee: 4.5,
      extra_fee: 0.0,
    };
    let derived = DerivedFields { total_explicit_fee: 4.8, ..Default::default() };
    let ts = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
    NormalizedRecord::new(&request, raw, rate, derived, ts)
  }

  #[test]
  fn test_csv_header_written_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quotes.csv");
    let mut sink = CsvSink::new(&path);

    assert_eq!(sink.append(&[record("Banxa", 1, MarketRate::Resolved(0.79))]).unwrap(), 1);
    assert_eq!(
      sink
        .append(&[
          record("Transak", 1, MarketRate::Resolved(0.79)),
          record("Ramp", 2, MarketRate::Unresolved)
        ])
        .unwrap(),
      2
    );

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    let leading = "Timestamp,Amount,FiatCurrency,CryptoCurrency,Region,PaymentMethod,Provider,Rank";
    assert!(lines[0].starts_with(leading));
    assert!(lines[0].ends_with("TotalExplicitFee,TotalFeeIncludingSpread,TotalFeePercentage"));
    assert_eq!(content.matches("Timestamp").count(), 1);
    assert!(lines[1].contains("USDT (BNB Chain)"));
    assert!(lines[1].contains(",GB,"));
  }

  #[test]
  fn test_csv_appends_to_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quotes.csv");

    CsvSink::new(&path).append(&[record("Banxa", 1, MarketRate::Resolved(0.79))]).unwrap();
    CsvSink::new(&path).append(&[record("Banxa", 1, MarketRate::Resolved(0.8))]).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 3);
    assert_eq!(content.matches("Timestamp").count(), 1);
  }

  #[test]
  fn test_unresolved_rate_is_empty_column() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quotes.csv");
    CsvSink::new(&path).append(&[record("Ramp", 1, MarketRate::Unresolved)]).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    let idx = headers.iter().position(|h| h == "MarketRate").unwrap();
    let row = reader.records().next().unwrap().unwrap();
    assert_eq!(&row[idx], "");
  }

  #[test]
  fn test_empty_batch_does_not_touch_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quotes.csv");
    assert_eq!(CsvSink::new(&path).append(&[]).unwrap(), 0);
    assert!(!path.exists());
  }

  #[test]
  fn test_missing_directory_is_io_error() {
    let dir = TempDir::new().unwrap();
    let mut sink = CsvSink::new(dir.path().join("nope").join("quotes.csv"));
    let err = sink.append(&[record("Banxa", 1, MarketRate::Unresolved)]).unwrap_err();
    assert!(matches!(err, crate::LoaderError::IoError(_)));
  }

  #[test]
  fn test_memory_sink() {
    let mut sink = MemorySink::new();
    sink.append(&[]).unwrap();
    sink
      .append(&[
        record("Banxa", 1, MarketRate::Unresolved),
        record("Ramp", 2, MarketRate::Unresolved)
      ])
      .unwrap();

    assert_eq!(sink.batches(), 1);
    assert_eq!(sink.rows().len(), 2);
    assert_eq!(sink.into_rows()[1].provider, "Ramp");
  }
}
