//! Volatility indicators over historical price bars.
//!
//! Currently provides the Average True Range (ATR) as a simple mean of true
//! ranges across a bar window.

pub mod volatility;

pub use volatility::AverageTrueRange;
