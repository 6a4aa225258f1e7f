//! Console display of streamed quotes.

use capital_core::traits::QuoteSink;
use capital_core::types::QuoteMessage;
use std::io::{self, Write};
use tracing::warn;

/// One display line for a quote.
pub fn format_quote(quote: &QuoteMessage) -> String {
    format!(
        "{:<12} bid {:>12.5} offer {:>12.5} mid {:>12.5} spread {:.5}",
        quote.epic,
        quote.bid,
        quote.offer,
        quote.mid(),
        quote.spread()
    )
}

/// Writes one line per quote.
pub struct ConsoleSink<W = io::Stdout> {
    out: W,
}

impl ConsoleSink<io::Stdout> {
    /// Sink printing to stdout.
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleSink<W> {
    /// Sink writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> QuoteSink for ConsoleSink<W> {
    fn display(&mut self, quote: &QuoteMessage) {
        if let Err(e) = writeln!(self.out, "{}", format_quote(quote)) {
            warn!(epic = %quote.epic, error = %e, "Failed to display quote");
        }
    }
}
