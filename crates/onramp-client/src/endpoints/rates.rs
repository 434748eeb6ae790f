use crate::traits::RateSource;
use crate::transport::Transport;
use async_trait::async_trait;
use onramp_core::{CurrencyPair, Result};
use onramp_models::RateAmountResponse;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Reference rate endpoint
///
/// Issues exactly one request per call; retry and caching live in
/// [`crate::RateResolver`].
pub struct RateEndpoints {
  transport: Arc<Transport>,
}

impl RateEndpoints {
  /// Create a new rate endpoints instance
  pub fn new(transport: Arc<Transport>) -> Self {
    Self { transport }
  }

  /// Fetch the fiat amount for one unit of the pair's crypto
  #[instrument(skip(self, pair), fields(pair = %pair))]
  pub async fn amount(&self, pair: &CurrencyPair) -> Result<RateAmountResponse> {
    let url = self.transport.rate_url(pair)?;
    let body = self.transport.get_json(&url).await?;
    let parsed: RateAmountResponse = serde_json::from_value(body)?;
    debug!("Rate response value: {:?}", parsed.value);
    Ok(parsed)
  }
}

#[async_trait]
impl RateSource for RateEndpoints {
  async fn fiat_per_unit(&self, pair: &CurrencyPair) -> Result<f64> {
    self.amount(pair).await?.fiat_per_unit()
  }
}
