//! Indicator trait definitions.

use crate::error::IndicatorError;
use crate::types::PriceBar;

/// Trait for indicators that reduce a bar window to a single value.
pub trait BarIndicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate the indicator over the whole window.
    ///
    /// # Arguments
    /// * `bars` - Bars ordered oldest to newest
    fn calculate(&self, bars: &[PriceBar]) -> Result<Self::Output, IndicatorError>;

    /// Get the minimum number of bars required.
    fn min_bars(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Validate that there's enough data.
    fn validate_data(&self, bars: &[PriceBar]) -> Result<(), IndicatorError> {
        if bars.len() < self.min_bars() {
            return Err(IndicatorError::InsufficientData {
                required: self.min_bars(),
                available: bars.len(),
            });
        }
        Ok(())
    }
}
