use thiserror::Error;

/// The main error type for onramp-* crates
#[derive(Error, Debug)]
pub enum Error {
  /// Environment variable error
  #[error("Environment variable error: {0}")]
  EnvVar(#[from] std::env::VarError),

  /// Configuration error
  #[error("Configuration error: {0}")]
  Config(String),

  /// Serialization/Deserialization error
  #[error("Serialization error: {0}")]
  Serde(#[from] serde_json::Error),

  /// Upstream signalled rate limiting (HTTP 429)
  #[error("Rate limit exceeded: {0}")]
  RateLimit(String),

  /// HTTP transport error (connect, timeout, body read)
  #[error("HTTP error: {0}")]
  Http(String),

  /// Non-success HTTP status other than 429
  #[error("HTTP status {status} from {url}")]
  HttpStatus { status: u16, url: String },

  /// Response body did not have the expected shape
  #[error("Parse error: {0}")]
  Parse(String),

  /// Crypto identifier path could not be split into chain id and token address
  #[error("Invalid crypto identifier: {0}")]
  InvalidIdentifier(String),

  /// Quote request failed validation
  #[error("Invalid quote request: {0}")]
  InvalidRequest(String),
}

impl Error {
  /// True when the upstream asked us to slow down. This is the only
  /// condition the rate resolver retries on.
  pub fn is_rate_limit(&self) -> bool {
    matches!(self, Error::RateLimit(_))
  }
}

/// Result type alias for onramp-* crates
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rate_limit_classification() {
    assert!(Error::RateLimit("429".to_string()).is_rate_limit());
    assert!(!Error::Http("connection reset".to_string()).is_rate_limit());
    assert!(!Error::HttpStatus { status: 500, url: "http://x".to_string() }.is_rate_limit());
    assert!(!Error::Parse("bad json".to_string()).is_rate_limit());
  }

  #[test]
  fn test_http_status_display() {
    let err = Error::HttpStatus { status: 503, url: "https://example.test/q".to_string() };
    assert_eq!(err.to_string(), "HTTP status 503 from https://example.test/q");
  }
}
