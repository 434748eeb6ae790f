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

//! Cached market rate resolution with backoff on rate limiting.
//!
//! Each lookup runs a small bounded-attempt state machine:
//!
//! ```text
//! Attempting(n) --ok-----------------------> Succeeded(v)
//! Attempting(n) --429, n < max, sleep d(n)--> Attempting(n + 1)
//! Attempting(n) --429, n = max, sleep d(n)--> Unresolved
//! Attempting(n) --any other error----------> Unresolved
//! ```
//!
//! with `d(n) = base * 2^(n-1)`. Both outcomes are cached for the lifetime
//! of the resolver, so a pair costs at most one lookup per sweep.

use crate::traits::RateSource;
use onramp_core::{Config, CurrencyPair, MarketRate, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Attempt budget and backoff schedule for rate lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  pub max_attempts: u32,
  pub base_delay: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts: onramp_core::DEFAULT_RATE_MAX_ATTEMPTS,
      base_delay: Duration::from_millis(onramp_core::DEFAULT_RATE_BACKOFF_MS),
    }
  }
}

impl RetryPolicy {
  pub fn from_config(config: &Config) -> Self {
    Self {
      max_attempts: config.rate_max_attempts.max(1),
      base_delay: Duration::from_millis(config.rate_backoff_base_ms),
    }
  }

  /// Sleep after the `attempt`-th (1-based) rate-limited answer.
  pub fn delay_for(&self, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    self.base_delay.saturating_mul(1 << exponent)
  }
}

/// Resolution state for one pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolveState {
  Attempting(u32),
  Succeeded(f64),
  Unresolved,
}

/// Transition out of `Attempting(attempt)` given the upstream outcome.
/// Returns the next state and the backoff to sleep before entering it.
pub fn next_state(
  policy: &RetryPolicy,
  attempt: u32,
  outcome: &Result<f64>,
) -> (ResolveState, Option<Duration>) {
  match outcome {
    Ok(value) => (ResolveState::Succeeded(*value), None),
    Err(e) if e.is_rate_limit() => {
      let delay = policy.delay_for(attempt);
      if attempt >= policy.max_attempts {
        (ResolveState::Unresolved, Some(delay))
      } else {
        (ResolveState::Attempting(attempt + 1), Some(delay))
      }
    }
    Err(_) => (ResolveState::Unresolved, None),
  }
}

/// Per-run cache of market rates in front of a [`RateSource`].
///
/// Construct one per sweep and hand it to the pipeline; dropping it drops the
/// cache.
pub struct RateResolver {
  source: Arc<dyn RateSource>,
  policy: RetryPolicy,
  cache: HashMap<CurrencyPair, MarketRate>,
  upstream_calls: u64,
}

impl RateResolver {
  pub fn new(source: Arc<dyn RateSource>, policy: RetryPolicy) -> Self {
    Self { source, policy, cache: HashMap::new(), upstream_calls: 0 }
  }

  /// Rate for `pair`, from cache or upstream. Never fails: every error ends
  /// as [`MarketRate::Unresolved`].
  pub async fn resolve(&mut self, pair: &CurrencyPair) -> MarketRate {
    if let Some(rate) = self.cache.get(pair) {
      debug!("Market rate cache hit for {}: {}", pair, rate);
      return *rate;
    }

    let rate = self.resolve_upstream(pair).await;
    match rate {
      MarketRate::Resolved(v) if v > 0.0 => info!("Market rate for {}: {:.2}", pair, v),
      MarketRate::Resolved(v) => warn!("Market rate for {} is unusable ({})", pair, v),
      MarketRate::Unresolved => warn!("Could not fetch market rate for {}", pair),
    }

    self.cache.insert(pair.clone(), rate);
    rate
  }

  async fn resolve_upstream(&mut self, pair: &CurrencyPair) -> MarketRate {
    let mut state = ResolveState::Attempting(1);
    loop {
      state = match state {
        ResolveState::Succeeded(v) => return MarketRate::Resolved(v),
        ResolveState::Unresolved => return MarketRate::Unresolved,
        ResolveState::Attempting(attempt) => {
          self.upstream_calls += 1;
          debug!("Rate lookup for {} (attempt {}/{})", pair, attempt, self.policy.max_attempts);

          let outcome = self.source.fiat_per_unit(pair).await;
          if let Err(e) = &outcome {
            if !e.is_rate_limit() {
              warn!("Error fetching market rate for {}: {}", pair, e);
            }
          }

          let (next, delay) = next_state(&self.policy, attempt, &outcome);
          if let Some(delay) = delay {
            warn!("Rate limited. Retrying in {}ms...", delay.as_millis());
            tokio::time::sleep(delay).await;
          }
          if next == ResolveState::Unresolved && delay.is_some() {
            warn!("Failed to fetch market rate for {} after {} attempts", pair, attempt);
          }
          next
        }
      };
    }
  }

  /// Cached rate without any I/O
  pub fn cached(&self, pair: &CurrencyPair) -> Option<MarketRate> {
    self.cache.get(pair).copied()
  }

  /// Number of pairs with a cached outcome
  pub fn len(&self) -> usize {
    self.cache.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cache.is_empty()
  }

  /// Upstream requests issued so far, retries included
  pub fn upstream_calls(&self) -> u64 {
    self.upstream_calls
  }

  pub fn policy(&self) -> &RetryPolicy {
    &self.policy
  }
}
