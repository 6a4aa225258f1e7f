//! Market navigation types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One instrument listed under a market navigation node.
///
/// Prices decode to `Decimal` from the JSON number's shortest form, so a
/// quoted `80.32` compares exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    /// Instrument identifier
    pub epic: String,
    /// Current bid, if the market is quoting
    #[serde(default)]
    pub bid: Option<Decimal>,
    /// Current offer, if the market is quoting
    #[serde(default)]
    pub offer: Option<Decimal>,
    #[serde(default)]
    pub instrument_name: Option<String>,
}

impl MarketSnapshot {
    /// Offer minus bid, when both sides are present.
    pub fn spread(&self) -> Option<Decimal> {
        match (self.bid, self.offer) {
            (Some(bid), Some(offer)) => Some(offer - bid),
            _ => None,
        }
    }
}

/// An instrument that passed the spread filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolCandidate {
    pub epic: String,
    /// Offer minus bid, rounded to two decimal places
    pub spread: Decimal,
}

impl SymbolCandidate {
    /// Create a candidate, rounding the spread to cents.
    pub fn new(epic: impl Into<String>, spread: Decimal) -> Self {
        Self {
            epic: epic.into(),
            spread: spread.round_dp(2),
        }
    }
}
