pub mod asset;
pub mod rate;
pub mod request;

pub use asset::{CryptoAsset, CurrencyPair};
pub use rate::MarketRate;
pub use request::QuoteRequest;
