//! CLI command implementations.

pub mod scan;
pub mod stream;
pub mod validate;

use anyhow::{Context, Result};
use capital_broker::CapitalClient;
use capital_config::{load_credentials, AppConfig};
use capital_core::traits::MarketApi;
use capital_core::types::Session;
use tracing::info;

/// Load credentials, build the REST client and log in.
///
/// Credentials are checked before any request is made.
pub(crate) async fn connect(config: &AppConfig) -> Result<(CapitalClient, Session)> {
    let credentials =
        load_credentials(&config.api).context("Capital.com credentials are not configured")?;

    let client = CapitalClient::new(config.api.client_config(&credentials.api_key))?;
    let session = client
        .create_session(&credentials)
        .await
        .context("Failed to create session")?;

    info!(api = client.name(), "Logged in");

    Ok((client, session))
}
