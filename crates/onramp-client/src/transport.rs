//! HTTP transport layer for the quote and rate APIs

use onramp_core::{Config, CurrencyPair, Error, QuoteRequest, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

/// HTTP transport shared by the rate and quote endpoints
pub struct Transport {
  client: Client,
  quote_base_url: String,
  rate_base_url: String,
  sdk_version: String,
  context: String,
  timeout: Duration,
}

impl Transport {
  /// Create a new transport instance
  pub fn new(config: &Config) -> Result<Self> {
    config.validate()?;

    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent(concat!("onramp-client/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self {
      client,
      quote_base_url: config.quote_base_url.clone(),
      rate_base_url: config.rate_base_url.clone(),
      sdk_version: config.sdk_version.clone(),
      context: config.context.clone(),
      timeout: Duration::from_secs(config.timeout_secs),
    })
  }

  /// URL for the 1-unit reference amount of `pair`:
  /// `/currencies/crypto/{chain}/{token}/amount?value=1&fiat=/currencies/fiat/{fiat}`
  pub fn rate_url(&self, pair: &CurrencyPair) -> Result<Url> {
    let mut url = parse_base(&self.rate_base_url)?;
    url
      .path_segments_mut()
      .map_err(|_| {
        Error::Config(format!("Rate base URL cannot carry a path: {}", self.rate_base_url))
      })?
      .pop_if_empty()
      .extend([
        "currencies",
        "crypto",
        pair.crypto().chain_id(),
        pair.crypto().token_address(),
        "amount",
      ]);

    url
      .query_pairs_mut()
      .append_pair("value", "1")
      .append_pair("fiat", &fiat_id(pair.fiat()));
    self.append_client_params(&mut url);

    Ok(url)
  }

  /// URL for `/providers/all/quote` with every request dimension encoded
  pub fn quote_url(&self, request: &QuoteRequest) -> Result<Url> {
    let mut url = parse_base(&self.quote_base_url)?;
    url
      .path_segments_mut()
      .map_err(|_| {
        Error::Config(format!("Quote base URL cannot carry a path: {}", self.quote_base_url))
      })?
      .pop_if_empty()
      .extend(["providers", "all", "quote"]);

    url
      .query_pairs_mut()
      .append_pair("regionId", &format!("/regions/{}", request.region().to_lowercase()))
      .append_pair("cryptoCurrencyId", request.crypto().id())
      .append_pair("fiatCurrencyId", &fiat_id(request.fiat()))
      .append_pair("amount", &request.amount().to_string())
      .append_pair("paymentMethodId[0]", &format!("/payments/{}", request.payment_method()))
      .append_pair("walletAddress", "");
    self.append_client_params(&mut url);

    Ok(url)
  }

  fn append_client_params(&self, url: &mut Url) {
    url
      .query_pairs_mut()
      .append_pair("sdk", &self.sdk_version)
      .append_pair("context", &self.context)
      .append_pair("keys", "");
  }

  /// GET `url` and decode the body as JSON.
  ///
  /// 429 maps to [`Error::RateLimit`], any other non-2xx status to
  /// [`Error::HttpStatus`], and an undecodable body to [`Error::Parse`].
  pub async fn get_json(&self, url: &Url) -> Result<Value> {
    debug!("Making request to: {}", url);

    let response = self
      .client
      .get(url.clone())
      .send()
      .await
      .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
      warn!("Rate limited by {}", url.host_str().unwrap_or("upstream"));
      return Err(Error::RateLimit(url.path().to_string()));
    }
    if !status.is_success() {
      error!("Request failed with status: {}", status);
      return Err(Error::HttpStatus { status: status.as_u16(), url: url.path().to_string() });
    }

    let text = response
      .text()
      .await
      .map_err(|e| Error::Http(format!("Failed to read response body: {}", e)))?;
    debug!("Response body length: {} bytes", text.len());

    serde_json::from_str(&text).map_err(|e| {
      error!("Failed to parse JSON response: {}", e);
      Error::Parse(format!("{}. Response: {}", e, truncate(&text, 200)))
    })
  }

  /// Get request timeout duration
  pub fn timeout(&self) -> Duration {
    self.timeout
  }
}

impl std::fmt::Debug for Transport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Transport")
      .field("quote_base_url", &self.quote_base_url)
      .field("rate_base_url", &self.rate_base_url)
      .field("sdk_version", &self.sdk_version)
      .field("timeout", &self.timeout)
      .finish()
  }
}

fn parse_base(base: &str) -> Result<Url> {
  Url::parse(base).map_err(|e| Error::Config(format!("Invalid base URL {}: {}", base, e)))
}

fn fiat_id(fiat: &str) -> String {
  format!("/currencies/fiat/{}", fiat.to_lowercase())
}

fn truncate(text: &str, max_chars: usize) -> &str {
  match text.char_indices().nth(max_chars) {
    Some((idx, _)) => &text[..idx],
    None => text,
  }
}
