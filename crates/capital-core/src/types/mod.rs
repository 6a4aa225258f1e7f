//! Core data types for the Capital.com client.

mod market;
mod price;
mod quote;
mod report;
mod session;

pub use market::{MarketSnapshot, SymbolCandidate};
pub use price::{PriceBar, Resolution};
pub use quote::QuoteMessage;
pub use report::{ScanReport, SymbolVolatility};
pub use session::{Credentials, Session};
