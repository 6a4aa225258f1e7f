//! Logging setup and console quote display.

mod display;
mod logging;

pub use display::{format_quote, ConsoleSink};
pub use logging::setup_logging;
