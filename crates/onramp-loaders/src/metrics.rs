//! Spread and fee math for one provider quote.
//!
//! Quotes are denominated in fiat on the way in and crypto on the way out.
//! The market rate (fiat per crypto unit) converts between the two so the
//! implicit cost hidden in a provider's exchange rate can be compared with
//! its explicit fees.

use onramp_core::MarketRate;
use onramp_models::{DerivedFields, RawQuote};

pub struct MetricsDeriver;

impl MetricsDeriver {
  /// Derive every metric for `raw` at `rate`.
  ///
  /// With an unusable rate or no `amountIn` the spread fields are zero and
  /// the totals fall back to explicit fees only.
  pub fn derive(raw: &RawQuote, rate: MarketRate) -> DerivedFields {
    let total_explicit_fee = raw.network_fee + raw.provider_fee + raw.extra_fee;
    let amount_in = raw.amount_in.unwrap_or(0.0);

    let mut derived = DerivedFields { total_explicit_fee, ..DerivedFields::default() };

    if let Some(rate) = rate.usable().filter(|_| amount_in != 0.0) {
      derived.expected_amount_out = (amount_in - total_explicit_fee) / rate;

      // Zero is treated as "no amount quoted"
      if let Some(amount_out) = raw.amount_out.filter(|v| *v != 0.0) {
        derived.spread = derived.expected_amount_out - amount_out;
        derived.spread_percentage = if derived.expected_amount_out > 0.0 {
          derived.spread / derived.expected_amount_out * 100.0
        } else {
          0.0
        };
        derived.spread_in_fiat = derived.spread * rate;
      }
    }

    derived.total_fee_including_spread = total_explicit_fee + derived.spread_in_fiat;
    derived.total_fee_percentage = if amount_in > 0.0 {
      derived.total_fee_including_spread / amount_in * 100.0
    } else {
      0.0
    };

    derived
  }
}
