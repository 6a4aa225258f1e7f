//! Market navigation scanner.
//!
//! Walks a list of navigation categories and keeps the instruments whose
//! spread is tight enough and whose price is high enough to be worth a
//! volatility check.

use capital_core::error::ApiError;
use capital_core::traits::MarketApi;
use capital_core::types::{MarketSnapshot, Session, SymbolCandidate};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// Spread and price thresholds for a candidate.
///
/// Both bounds are strict: a market is kept iff `offer - bid < max_spread`
/// and `bid > min_bid`, compared in decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpreadFilter {
    pub max_spread: Decimal,
    pub min_bid: Decimal,
}

impl SpreadFilter {
    /// Create a filter with custom thresholds.
    pub fn new(max_spread: Decimal, min_bid: Decimal) -> Self {
        Self {
            max_spread,
            min_bid,
        }
    }

    /// Check whether a bid/offer pair qualifies.
    pub fn accepts(&self, bid: Decimal, spread: Decimal) -> bool {
        spread < self.max_spread && bid > self.min_bid
    }

    /// Evaluate a market; markets missing either side never qualify.
    pub fn evaluate(&self, market: &MarketSnapshot) -> Option<SymbolCandidate> {
        let (bid, spread) = (market.bid?, market.spread()?);
        if !self.accepts(bid, spread) {
            return None;
        }
        Some(SymbolCandidate::new(market.epic.clone(), spread))
    }
}

impl Default for SpreadFilter {
    /// Spread under 0.2, bid over 80.
    fn default() -> Self {
        Self::new(Decimal::new(2, 1), Decimal::from(80))
    }
}

/// Scanner configuration.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Navigation node ids, scanned in order
    pub categories: Vec<String>,
    pub filter: SpreadFilter,
}

impl ScannerConfig {
    /// Default US shares categories.
    pub fn us_shares() -> Self {
        Self {
            categories: vec![
                "hierarchy_v1.shares.us.most_traded".to_string(),
                "hierarchy_v1.shares.us.top_gainers".to_string(),
                "hierarchy_v1.shares.us.top_losers".to_string(),
                "hierarchy_v1.shares.us.most_volatile".to_string(),
            ],
            filter: SpreadFilter::default(),
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self::us_shares()
    }
}

/// Scans navigation categories for tight-spread instruments.
pub struct SymbolScanner {
    config: ScannerConfig,
}

impl SymbolScanner {
    /// Create a new scanner.
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Get the scanner configuration.
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Run the scan.
    ///
    /// Candidates come back in category order, then market order; an epic
    /// listed under several categories appears once per category. A category
    /// that fails with a partial fetch or data shape error is logged and
    /// skipped. Any other error aborts the scan.
    pub async fn scan<A>(&self, api: &A, session: &Session) -> Result<Vec<SymbolCandidate>, ApiError>
    where
        A: MarketApi + ?Sized,
    {
        let mut candidates = Vec::new();

        for node_id in &self.config.categories {
            let markets = match api.market_navigation(session, node_id).await {
                Ok(markets) => markets,
                Err(e) if !e.is_fatal() => {
                    warn!(node_id = %node_id, error = %e, "Skipping category");
                    continue;
                }
                Err(e) => return Err(e),
            };

            let before = candidates.len();
            candidates.extend(markets.iter().filter_map(|m| self.config.filter.evaluate(m)));

            debug!(
                node_id = %node_id,
                markets = markets.len(),
                matched = candidates.len() - before,
                "Scanned category"
            );
        }

        info!(count = candidates.len(), "Symbol scan complete");
        Ok(candidates)
    }
}
