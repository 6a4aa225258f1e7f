//! Volatility indicators.

use capital_core::error::IndicatorError;
use capital_core::traits::BarIndicator;
use capital_core::types::PriceBar;

/// Average True Range (ATR).
///
/// Measures market volatility as the arithmetic mean of the true ranges of
/// every adjacent bar pair in the window. No Wilder smoothing is applied, so
/// the value depends only on the bars supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageTrueRange;

impl AverageTrueRange {
    /// Create a new ATR indicator.
    pub fn new() -> Self {
        Self
    }

    /// True range for each bar after the first.
    pub fn true_ranges(bars: &[PriceBar]) -> Vec<f64> {
        bars.windows(2)
            .map(|pair| pair[1].true_range(pair[0].close_bid))
            .collect()
    }
}

impl BarIndicator for AverageTrueRange {
    type Output = f64;

    fn calculate(&self, bars: &[PriceBar]) -> Result<f64, IndicatorError> {
        self.validate_data(bars)?;

        let tr = Self::true_ranges(bars);
        Ok(tr.iter().sum::<f64>() / tr.len() as f64)
    }

    /// One true range needs a previous close.
    fn min_bars(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        "ATR"
    }
}
