//! Streaming quote types.

use serde::{Deserialize, Serialize};

/// A single quote update pushed by the streaming endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteMessage {
    /// Frame destination, `quote` for price updates
    pub destination: String,
    pub epic: String,
    pub bid: f64,
    pub offer: f64,
}

impl QuoteMessage {
    /// Get the mid price.
    pub fn mid(&self) -> f64 {
        (self.bid + self.offer) / 2.0
    }

    /// Get the spread.
    pub fn spread(&self) -> f64 {
        self.offer - self.bid
    }
}
