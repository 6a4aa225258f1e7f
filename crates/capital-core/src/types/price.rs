//! Historical price types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A historical price bar, bid side of each OHLC field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Bar open time as reported by the API
    pub snapshot_time: Option<String>,
    /// Opening bid
    pub open_bid: Option<f64>,
    /// Highest bid
    pub high_bid: f64,
    /// Lowest bid
    pub low_bid: f64,
    /// Closing bid
    pub close_bid: f64,
}

impl PriceBar {
    /// Create a bar from its high, low and close bids.
    pub fn new(high_bid: f64, low_bid: f64, close_bid: f64) -> Self {
        Self {
            snapshot_time: None,
            open_bid: None,
            high_bid,
            low_bid,
            close_bid,
        }
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high_bid - self.low_bid
    }

    /// Calculate the true range against the previous bar's close.
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.range();
        let hc = (self.high_bid - prev_close).abs();
        let lc = (self.low_bid - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Price bar resolution accepted by the prices endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Resolution {
    Minute,
    #[serde(rename = "MINUTE_5")]
    Minute5,
    #[serde(rename = "MINUTE_15")]
    Minute15,
    #[serde(rename = "MINUTE_30")]
    Minute30,
    Hour,
    #[serde(rename = "HOUR_4")]
    Hour4,
    #[default]
    Day,
    Week,
}

impl Resolution {
    /// Wire value for the `resolution` query parameter.
    ///
    /// Always the full API name (`DAY`, never `D`); aliases are only
    /// accepted when parsing.
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Minute => "MINUTE",
            Resolution::Minute5 => "MINUTE_5",
            Resolution::Minute15 => "MINUTE_15",
            Resolution::Minute30 => "MINUTE_30",
            Resolution::Hour => "HOUR",
            Resolution::Hour4 => "HOUR_4",
            Resolution::Day => "DAY",
            Resolution::Week => "WEEK",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MINUTE" | "1M" => Ok(Resolution::Minute),
            "MINUTE_5" | "5M" => Ok(Resolution::Minute5),
            "MINUTE_15" | "15M" => Ok(Resolution::Minute15),
            "MINUTE_30" | "30M" => Ok(Resolution::Minute30),
            "HOUR" | "1H" => Ok(Resolution::Hour),
            "HOUR_4" | "4H" => Ok(Resolution::Hour4),
            "DAY" | "D" | "1D" | "DAILY" => Ok(Resolution::Day),
            "WEEK" | "W" | "1W" | "WEEKLY" => Ok(Resolution::Week),
            _ => Err(format!("Invalid resolution: {}", s)),
        }
    }
}
