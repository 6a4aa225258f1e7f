//! Presentation sink trait.

use crate::types::QuoteMessage;

/// Receives quotes for display.
///
/// The stream client owns one sink per displayed epic and calls it for every
/// quote on that epic.
pub trait QuoteSink: Send {
    /// Show the latest quote.
    fn display(&mut self, quote: &QuoteMessage);
}

impl<F> QuoteSink for F
where
    F: FnMut(&QuoteMessage) + Send,
{
    fn display(&mut self, quote: &QuoteMessage) {
        self(quote)
    }
}
