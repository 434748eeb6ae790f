//! # onramp-models
//!
//! Data models for the on-ramp quote API and the reference rate API, plus the
//! normalized record handed to sinks.
//!
//! Upstream payloads are partially trusted: provider entries are read field by
//! field with explicit defaults so that one odd entry never fails a batch.
//!
//! ## Usage
//!
//! ```ignore
//! use onramp_models::QuoteResponse;
//!
//! let body: serde_json::Value = serde_json::from_str(&response_json)?;
//! let response = QuoteResponse::from_json(&body)?;
//! for quote in &response.quotes {
//!     println!("#{} {}", quote.rank, quote.provider);
//! }
//! ```

#![warn(clippy::all)]

pub mod common;
pub mod quote;
pub mod rate;
pub mod record;

pub use common::*;
pub use quote::*;
pub use rate::*;
pub use record::*;
