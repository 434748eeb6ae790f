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

//! Provider quote endpoint response and the ranked raw quotes extracted from it

use crate::common::{fee_or_zero, lenient_f64, non_empty_str};
use onramp_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provider name used when an entry carries no `providerInfo.name`.
pub const UNKNOWN_PROVIDER: &str = "N/A";

/// One provider's quote, as returned upstream, with its position in the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuote {
  pub provider: String,
  /// 1-based position in the upstream `success` list
  pub rank: u32,
  pub amount_in: Option<f64>,
  pub amount_out: Option<f64>,
  pub exchange_rate: Option<f64>,
  pub network_fee: f64,
  pub provider_fee: f64,
  pub extra_fee: f64,
}

impl RawQuote {
  /// Read one `success` entry. Never fails: every missing or odd field falls
  /// back to its default so ranks stay aligned with the upstream list.
  pub fn from_entry(rank: u32, entry: &Value) -> Self {
    let provider = entry
      .get("providerInfo")
      .and_then(|info| non_empty_str(info.get("name")))
      .unwrap_or_else(|| UNKNOWN_PROVIDER.to_string());

    let quote = entry.get("quote");

    Self {
      provider,
      rank,
      amount_in: lenient_f64(quote_field(quote, "amountIn")),
      amount_out: lenient_f64(quote_field(quote, "amountOut")),
      exchange_rate: lenient_f64(quote_field(quote, "exchangeRate")),
      network_fee: fee_or_zero(quote_field(quote, "networkFee")),
      provider_fee: fee_or_zero(quote_field(quote, "providerFee")),
      extra_fee: fee_or_zero(quote_field(quote, "extraFee")),
    }
  }
}

fn quote_field<'a>(quote: Option<&'a Value>, key: &str) -> Option<&'a Value> {
  quote.and_then(|q| q.get(key))
}

/// Parsed body of `/providers/all/quote`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteResponse {
  /// Quotes in upstream order, ranked `1..=N`
  pub quotes: Vec<RawQuote>,
  /// Number of entries in the upstream `error` list
  pub rejected_providers: usize,
}

impl QuoteResponse {
  /// Build from the decoded JSON body.
  ///
  /// A missing, null, `false`, or empty `success` yields no quotes; that is
  /// an ordinary outcome. A body that is not an object, or a `success` of
  /// any other shape, is a parse error.
  pub fn from_json(body: &Value) -> Result<Self> {
    let object = body
      .as_object()
      .ok_or_else(|| Error::Parse(format!("quote response is not an object: {}", body)))?;

    let quotes = match object.get("success") {
      None | Some(Value::Null) | Some(Value::Bool(false)) => Vec::new(),
      Some(Value::Array(entries)) => entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| RawQuote::from_entry(idx as u32 + 1, entry))
        .collect(),
      Some(other) => {
        return Err(Error::Parse(format!("unexpected quote `success` value: {}", other)));
      }
    };

    let rejected_providers = object.get("error").and_then(Value::as_array).map_or(0, Vec::len);

    Ok(Self { quotes, rejected_providers })
  }

  pub fn is_empty(&self) -> bool {
    self.quotes.is_empty()
  }
}
