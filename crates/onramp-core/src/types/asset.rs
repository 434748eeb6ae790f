/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Crypto asset identifiers and the (crypto, fiat) pair used to key rate lookups.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const CRYPTO_PREFIX: &str = "/currencies/crypto/";

/// A purchasable crypto asset: a human label plus the upstream identifier path
/// `/currencies/crypto/{chain_id}/{token_address}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "AssetSpec", into = "AssetSpec")]
pub struct CryptoAsset {
  label: String,
  id: String,
  chain_id: String,
  token_address: String,
}

#[derive(Serialize, Deserialize)]
struct AssetSpec {
  label: String,
  id: String,
}

impl TryFrom<AssetSpec> for CryptoAsset {
  type Error = Error;

  fn try_from(spec: AssetSpec) -> Result<Self> {
    CryptoAsset::new(spec.label, spec.id)
  }
}

impl From<CryptoAsset> for AssetSpec {
  fn from(asset: CryptoAsset) -> Self {
    AssetSpec { label: asset.label, id: asset.id }
  }
}

impl CryptoAsset {
  /// Parse the identifier path; anything other than
  /// `/currencies/crypto/<chain>/<token>` is rejected.
  pub fn new(label: impl Into<String>, id: impl Into<String>) -> Result<Self> {
    let id = id.into();
    let rest = id
      .strip_prefix(CRYPTO_PREFIX)
      .ok_or_else(|| Error::InvalidIdentifier(format!("{} (expected {}...)", id, CRYPTO_PREFIX)))?;

    let mut parts = rest.split('/');
    let (chain_id, token_address) = match (parts.next(), parts.next(), parts.next()) {
      (Some(chain), Some(token), None) if !chain.is_empty() && !token.is_empty() => {
        (chain.to_string(), token.to_string())
      }
      _ => return Err(Error::InvalidIdentifier(id)),
    };

    Ok(Self { label: label.into(), id, chain_id, token_address })
  }

  pub fn label(&self) -> &str {
    &self.label
  }

  /// Full identifier path as sent to the quote endpoint
  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn chain_id(&self) -> &str {
    &self.chain_id
  }

  pub fn token_address(&self) -> &str {
    &self.token_address
  }
}

impl fmt::Display for CryptoAsset {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.label)
  }
}

/// Identity key for the market rate cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
  crypto: CryptoAsset,
  fiat: String,
}

impl CurrencyPair {
  /// Fiat codes are stored upper case so `eur` and `EUR` share a cache entry.
  pub fn new(crypto: CryptoAsset, fiat: &str) -> Self {
    Self { crypto, fiat: fiat.trim().to_uppercase() }
  }

  pub fn crypto(&self) -> &CryptoAsset {
    &self.crypto
  }

  pub fn fiat(&self) -> &str {
    &self.fiat
  }
}

impl fmt::Display for CurrencyPair {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.crypto.label(), self.fiat)
  }
}
