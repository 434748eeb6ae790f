//! # onramp-core
//!
//! Core types shared by every crate of the on-ramp quote sweep:
//! configuration, the error type, and the identity types that key rate
//! lookups and quote requests.

pub mod config;
pub mod error;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::Config;
pub use error::{Error, Result};
pub use types::{CryptoAsset, CurrencyPair, MarketRate, QuoteRequest};

/// Base URL for the provider quote API
pub const QUOTE_BASE_URL: &str = "https://on-ramp.api.cx.metamask.io";

/// Base URL for the reference rate API
pub const RATE_BASE_URL: &str = "https://on-ramp-cache.api.cx.metamask.io";

/// SDK version reported to both APIs
pub const SDK_VERSION: &str = "2.1.8";

/// Client context reported to both APIs
pub const SDK_CONTEXT: &str = "browser";

/// Rate lookups give up after this many 429 answers
pub const DEFAULT_RATE_MAX_ATTEMPTS: u32 = 3;

/// First backoff delay (ms) after a 429 from the rate endpoint
pub const DEFAULT_RATE_BACKOFF_MS: u64 = 1000;

/// Minimum spacing (ms) between quote requests
pub const DEFAULT_QUOTE_SPACING_MS: u64 = 100;
