use super::DirectRateLimiter;
use crate::traits::QuoteSource;
use crate::transport::Transport;
use async_trait::async_trait;
use onramp_core::{QuoteRequest, Result};
use onramp_models::{QuoteResponse, RawQuote};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Provider quote endpoint
pub struct QuoteEndpoints {
  transport: Arc<Transport>,
  rate_limiter: Option<Arc<DirectRateLimiter>>,
}

impl QuoteEndpoints {
  /// Create a new quote endpoints instance. With a limiter, consecutive
  /// requests through any handle sharing it are spaced by its period.
  pub fn new(transport: Arc<Transport>, rate_limiter: Option<Arc<DirectRateLimiter>>) -> Self {
    Self { transport, rate_limiter }
  }

  async fn wait_for_rate_limit(&self) {
    if let Some(limiter) = &self.rate_limiter {
      limiter.until_ready().await;
    }
  }

  /// Fetch every provider's quote for the request
  ///
  /// No retry: transport errors and non-2xx statuses are returned as-is.
  #[instrument(
    skip(self, request),
    fields(
      region = request.region(),
      fiat = request.fiat(),
      amount = request.amount(),
      payment_method = request.payment_method(),
      crypto = request.crypto().label()
    )
  )]
  pub async fn quote_response(&self, request: &QuoteRequest) -> Result<QuoteResponse> {
    self.wait_for_rate_limit().await;

    let url = self.transport.quote_url(request)?;
    let body = self.transport.get_json(&url).await?;
    let response = QuoteResponse::from_json(&body)?;

    debug!(
      "{} provider quotes, {} providers rejected the request",
      response.quotes.len(),
      response.rejected_providers
    );
    Ok(response)
  }
}

#[async_trait]
impl QuoteSource for QuoteEndpoints {
  async fn fetch(&self, request: &QuoteRequest) -> Result<Vec<RawQuote>> {
    Ok(self.quote_response(request).await?.quotes)
  }
}
