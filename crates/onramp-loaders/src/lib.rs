//! # onramp-loaders
//!
//! Turns raw provider quotes into normalized, comparable records.
//!
//! This crate provides:
//! - Spread and fee derivation against the reference market rate
//! - The per-tuple normalization pipeline (resolve, fetch, derive)
//! - The sweep driver over amounts, assets, regions and payment methods
//! - CSV and in-memory record sinks
//! - Per-provider summaries by price bin

pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod sink;
pub mod sweep;

// Re-export commonly used types
pub use error::{LoaderError, LoaderResult};
pub use metrics::MetricsDeriver;
pub use pipeline::{NormalizationPipeline, PipelineOutput};
pub use report::{PriceBin, ProviderSummary, read_csv, summarize};
pub use sink::{CsvSink, MemorySink, RecordSink};
pub use sweep::{RegionPlan, SweepPlan, SweepStats, run_sweep, run_sweep_with_progress};

// Prelude for convenient imports
pub mod prelude {
  pub use crate::{
    CsvSink, LoaderError, LoaderResult, MemorySink, MetricsDeriver, NormalizationPipeline,
    RecordSink, SweepPlan, SweepStats, run_sweep,
  };
}
