//! # onramp-client
//!
//! Async client for the on-ramp provider quote API and the reference rate
//! API, plus the cached rate resolver that sits in front of the latter.
//!
//! ## Features
//!
//! - **Quote endpoint**: one GET per request tuple, ranked provider quotes
//! - **Rate endpoint**: fiat per one unit of crypto
//! - **Rate resolution**: per-run cache with exponential backoff on 429
//! - **Request spacing**: a shared governor limiter paces quote calls
//!
//! ## Usage
//!
//! ```rust,no_run
//! use onramp_client::OnRampClient;
//! use onramp_core::{Config, CryptoAsset, CurrencyPair};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let client = OnRampClient::new(Config::from_env()?)?;
//!   let mut resolver = client.rate_resolver();
//!
//!   let eth = CryptoAsset::new(
//!     "ETH (Mainnet)",
//!     "/currencies/crypto/1/0x0000000000000000000000000000000000000000",
//!   )?;
//!   let rate = resolver.resolve(&CurrencyPair::new(eth, "EUR")).await;
//!   println!("ETH/EUR: {}", rate);
//!   Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Endpoint methods return `Result<T, onramp_core::Error>`. The resolver never
//! fails; it reports [`onramp_core::MarketRate::Unresolved`] instead.

#![warn(clippy::all)]

pub mod client;
pub mod endpoints;
pub mod resolver;
pub mod traits;
pub mod transport;

pub use client::OnRampClient;
pub use endpoints::{DirectRateLimiter, quotes::QuoteEndpoints, rates::RateEndpoints};
pub use onramp_core::{Config, Error, Result};
pub use resolver::{RateResolver, ResolveState, RetryPolicy};
pub use traits::{QuoteSource, RateSource};
pub use transport::Transport;
