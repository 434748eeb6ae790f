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

use crate::endpoints::{DirectRateLimiter, quotes::QuoteEndpoints, rates::RateEndpoints};
use crate::resolver::{RateResolver, RetryPolicy};
use crate::transport::Transport;
use governor::{Quota, RateLimiter};
use onramp_core::{Config, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Client for the on-ramp quote and reference rate APIs
///
/// Owns the HTTP transport and the limiter that spaces quote requests.
/// Endpoint handles are cheap to create and share both.
///
/// # Examples
///
/// ```rust,no_run
/// use onramp_client::OnRampClient;
/// use onramp_core::{Config, CryptoAsset, QuoteRequest};
///
/// # async fn run() -> onramp_core::Result<()> {
/// let config = Config::from_env()?;
/// let client = OnRampClient::new(config.clone())?;
///
/// let eth = CryptoAsset::new(
///   "ETH (Mainnet)",
///   "/currencies/crypto/1/0x0000000000000000000000000000000000000000",
/// )?;
/// let request = QuoteRequest::new("de", "EUR", 100.0, "sepa-bank-transfer", eth)?;
/// let quotes = client.quotes().quote_response(&request).await?;
/// println!("{} quotes", quotes.quotes.len());
/// # Ok(())
/// # }
/// ```
pub struct OnRampClient {
  transport: Arc<Transport>,
  quote_limiter: Option<Arc<DirectRateLimiter>>,
  retry_policy: RetryPolicy,
}

impl OnRampClient {
  /// Create a new client
  ///
  /// # Errors
  ///
  /// Returns an error if the configuration is invalid or the HTTP client
  /// cannot be created.
  pub fn new(config: Config) -> Result<Self> {
    let transport = Arc::new(Transport::new(&config)?);

    // Zero spacing disables the limiter entirely
    let quote_limiter = Quota::with_period(Duration::from_millis(config.quote_request_spacing_ms))
      .map(|quota| Arc::new(RateLimiter::direct(quota)));
    debug!(
      "Quote spacing: {}ms (limiter {})",
      config.quote_request_spacing_ms,
      if quote_limiter.is_some() { "on" } else { "off" }
    );

    Ok(Self { transport, quote_limiter, retry_policy: RetryPolicy::from_config(&config) })
  }

  /// Create a new client with a caller-supplied quote limiter
  pub fn with_rate_limiter(config: Config, rate_limiter: Arc<DirectRateLimiter>) -> Result<Self> {
    Ok(Self {
      transport: Arc::new(Transport::new(&config)?),
      quote_limiter: Some(rate_limiter),
      retry_policy: RetryPolicy::from_config(&config),
    })
  }

  /// Reference rate endpoint, one request per call
  pub fn rates(&self) -> RateEndpoints {
    RateEndpoints::new(self.transport.clone())
  }

  /// Provider quote endpoint, spaced by the shared limiter
  pub fn quotes(&self) -> QuoteEndpoints {
    QuoteEndpoints::new(self.transport.clone(), self.quote_limiter.clone())
  }

  /// Fresh rate resolver with an empty cache over this client's rate endpoint
  pub fn rate_resolver(&self) -> RateResolver {
    RateResolver::new(Arc::new(self.rates()), self.retry_policy)
  }

  pub fn retry_policy(&self) -> RetryPolicy {
    self.retry_policy
  }

  pub fn transport(&self) -> &Transport {
    &self.transport
  }
}

impl std::fmt::Debug for OnRampClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("OnRampClient")
      .field("transport", &self.transport)
      .field("quote_limiter", &self.quote_limiter.is_some())
      .field("retry_policy", &self.retry_policy)
      .finish()
  }
}
