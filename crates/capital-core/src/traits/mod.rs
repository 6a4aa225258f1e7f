//! Core traits for the Capital.com client.

mod indicator;
mod market_api;
mod sink;

pub use indicator::BarIndicator;
pub use market_api::MarketApi;
pub use sink::QuoteSink;
