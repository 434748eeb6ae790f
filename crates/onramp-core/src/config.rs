//! Configuration management for the on-ramp quote sweep

use crate::error::{Error, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use url::Url;

/// Main configuration struct for the quote and rate endpoints
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Config {
  /// Base URL for the provider quote endpoint
  pub quote_base_url: String,

  /// Base URL for the reference rate endpoint
  pub rate_base_url: String,

  /// `sdk` query parameter sent with every request
  pub sdk_version: String,

  /// `context` query parameter sent with every request
  pub context: String,

  /// Request timeout in seconds
  pub timeout_secs: u64,

  /// Maximum attempts when the rate endpoint answers 429
  pub rate_max_attempts: u32,

  /// First backoff delay in milliseconds; doubles after each 429
  pub rate_backoff_base_ms: u64,

  /// Minimum spacing between consecutive quote requests in milliseconds
  pub quote_request_spacing_ms: u64,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      quote_base_url: crate::QUOTE_BASE_URL.to_string(),
      rate_base_url: crate::RATE_BASE_URL.to_string(),
      sdk_version: crate::SDK_VERSION.to_string(),
      context: crate::SDK_CONTEXT.to_string(),
      timeout_secs: 30,
      rate_max_attempts: crate::DEFAULT_RATE_MAX_ATTEMPTS,
      rate_backoff_base_ms: crate::DEFAULT_RATE_BACKOFF_MS,
      quote_request_spacing_ms: crate::DEFAULT_QUOTE_SPACING_MS,
    }
  }
}

impl Config {
  /// Load configuration from environment variables, falling back to defaults
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let defaults = Config::default();

    let config = Config {
      quote_base_url: string_env("ONRAMP_QUOTE_BASE_URL", defaults.quote_base_url)?,
      rate_base_url: string_env("ONRAMP_RATE_BASE_URL", defaults.rate_base_url)?,
      sdk_version: string_env("ONRAMP_SDK_VERSION", defaults.sdk_version)?,
      context: string_env("ONRAMP_CONTEXT", defaults.context)?,
      timeout_secs: parse_env("ONRAMP_TIMEOUT_SECS", defaults.timeout_secs)?,
      rate_max_attempts: parse_env("ONRAMP_RATE_MAX_ATTEMPTS", defaults.rate_max_attempts)?,
      rate_backoff_base_ms: parse_env("ONRAMP_RATE_BACKOFF_MS", defaults.rate_backoff_base_ms)?,
      quote_request_spacing_ms: parse_env(
        "ONRAMP_QUOTE_SPACING_MS",
        defaults.quote_request_spacing_ms,
      )?,
    };

    config.validate()?;
    Ok(config)
  }

  /// Config pointing both endpoints at one base URL, for mock servers
  pub fn with_base_url(base_url: &str) -> Self {
    Config {
      quote_base_url: base_url.to_string(),
      rate_base_url: base_url.to_string(),
      ..Config::default()
    }
  }

  /// Check the URLs parse and the retry budget is usable
  pub fn validate(&self) -> Result<()> {
    Url::parse(&self.quote_base_url)
      .map_err(|e| Error::Config(format!("Invalid quote base URL: {}", e)))?;
    Url::parse(&self.rate_base_url)
      .map_err(|e| Error::Config(format!("Invalid rate base URL: {}", e)))?;

    if self.rate_max_attempts == 0 {
      return Err(Error::Config("rate_max_attempts must be at least 1".to_string()));
    }

    Ok(())
  }
}

/// Unset falls back to `default`; a value that is not valid unicode is an error
fn string_env(key: &str, default: String) -> Result<String> {
  match env::var(key) {
    Ok(raw) => Ok(raw),
    Err(env::VarError::NotPresent) => Ok(default),
    Err(e) => Err(e.into()),
  }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T> {
  match env::var(key) {
    Ok(raw) => raw.trim().parse().map_err(|_| Error::Config(format!("Invalid {}", key))),
    Err(env::VarError::NotPresent) => Ok(default),
    Err(e) => Err(e.into()),
  }
}
