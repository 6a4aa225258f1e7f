//! Market API trait definition.

use crate::error::ApiError;
use crate::types::{Credentials, MarketSnapshot, PriceBar, Resolution, Session};
use async_trait::async_trait;

/// Trait for the REST operations shared by the scan and stream pipelines.
///
/// One implementation authenticates and then serves both the polling
/// pipeline (navigation and prices) and the streaming pipeline (session only).
#[async_trait]
pub trait MarketApi: Send + Sync {
    /// Log in and obtain session tokens.
    ///
    /// # Errors
    /// `AuthFailure` when the status is not 200 or either token header is
    /// missing; `Transport` when the request never completes.
    async fn create_session(&self, credentials: &Credentials) -> Result<Session, ApiError>;

    /// List the markets under a navigation node.
    ///
    /// # Arguments
    /// * `session` - Authenticated session
    /// * `node_id` - Navigation node, e.g. `hierarchy_v1.shares.us.most_traded`
    async fn market_navigation(
        &self,
        session: &Session,
        node_id: &str,
    ) -> Result<Vec<MarketSnapshot>, ApiError>;

    /// Fetch a bounded window of historical bars for `epic`.
    ///
    /// `resolution` goes on the wire as its API name, so the daily default
    /// is sent as `resolution=DAY` rather than the short `D` alias.
    ///
    /// # Returns
    /// Bars in the order the API returned them
    async fn historical_prices(
        &self,
        session: &Session,
        epic: &str,
        resolution: Resolution,
        max_results: usize,
    ) -> Result<Vec<PriceBar>, ApiError>;

    /// Get the API name.
    fn name(&self) -> &str;
}
