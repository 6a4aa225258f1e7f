//! Capital.com REST client.

use async_trait::async_trait;
use capital_core::error::ApiError;
use capital_core::traits::MarketApi;
use capital_core::types::{Credentials, MarketSnapshot, PriceBar, Resolution, Session};
use reqwest::{Client, Response, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

const API_KEY_HEADER: &str = "X-CAP-API-KEY";
const CST_HEADER: &str = "CST";
const SECURITY_TOKEN_HEADER: &str = "X-SECURITY-TOKEN";

/// REST client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL, e.g. `https://demo-api-capital.backend-capital.com`
    pub rest_url: String,
    pub api_key: String,
    /// Per-request timeout; `None` keeps the transport default
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create config with the transport's default timeout.
    pub fn new(rest_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            rest_url: rest_url.into(),
            api_key: api_key.into(),
            request_timeout: None,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.rest_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Serialize)]
struct SessionRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    #[serde(default)]
    account_info: Option<AccountInfo>,
}

#[derive(Debug, Deserialize)]
struct AccountInfo {
    #[serde(default)]
    balance: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct NavigationResponse {
    /// Decoded one market at a time so a bad row does not sink the node
    #[serde(default)]
    markets: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct PricesResponse {
    #[serde(default)]
    prices: Option<Vec<WirePriceBar>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePriceBar {
    #[serde(default)]
    snapshot_time: Option<String>,
    #[serde(default)]
    open_price: Option<WirePrice>,
    #[serde(default)]
    high_price: Option<WirePrice>,
    #[serde(default)]
    low_price: Option<WirePrice>,
    #[serde(default)]
    close_price: Option<WirePrice>,
}

#[derive(Debug, Deserialize)]
struct WirePrice {
    #[serde(default)]
    bid: Option<f64>,
}

impl WirePriceBar {
    fn into_bar(self, index: usize) -> Result<PriceBar, String> {
        fn bid(price: Option<WirePrice>, field: &str, index: usize) -> Result<f64, String> {
            price
                .and_then(|p| p.bid)
                .ok_or_else(|| format!("bar {} missing {}.bid", index, field))
        }

        Ok(PriceBar {
            high_bid: bid(self.high_price, "highPrice", index)?,
            low_bid: bid(self.low_price, "lowPrice", index)?,
            close_bid: bid(self.close_price, "closePrice", index)?,
            open_bid: self.open_price.and_then(|p| p.bid),
            snapshot_time: self.snapshot_time,
        })
    }
}

/// Capital.com REST client.
pub struct CapitalClient {
    config: ClientConfig,
    client: Client,
}

impl CapitalClient {
    /// Create a new REST client.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Read a non-empty header value.
    fn header(resp: &Response, name: &str) -> Option<String> {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Read the body as JSON, separating transport failures from shape errors.
    async fn decode<T: DeserializeOwned>(resp: Response, resource: &str) -> Result<T, ApiError> {
        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        serde_json::from_str(&text).map_err(|e| ApiError::data_shape(resource, e.to_string()))
    }

    /// Turn a non-200 response into a per-resource fetch failure.
    async fn partial_failure(resp: Response, resource: &str) -> ApiError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        ApiError::PartialFetch {
            resource: resource.to_string(),
            status,
            body,
        }
    }
}

#[async_trait]
impl MarketApi for CapitalClient {
    async fn create_session(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let url = self.config.endpoint("session");
        let body = SessionRequest {
            identifier: &credentials.identifier,
            password: &credentials.password,
        };

        debug!(identifier = %credentials.identifier, "Creating session");

        let resp = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &credentials.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if resp.status() != StatusCode::OK {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(ApiError::AuthFailure(format!(
                "session creation returned {}: {}",
                status, text
            )));
        }

        let cst = Self::header(&resp, CST_HEADER);
        let security_token = Self::header(&resp, SECURITY_TOKEN_HEADER);

        let (cst, security_token) = match (cst, security_token) {
            (Some(cst), Some(token)) => (cst, token),
            _ => {
                return Err(ApiError::AuthFailure(
                    "failed to retrieve CST or security token".into(),
                ))
            }
        };

        let data: SessionResponse = Self::decode(resp, "session").await?;
        let balance = data.account_info.and_then(|info| info.balance);
        if balance.is_none() {
            warn!("Session response carried no accountInfo.balance");
        }

        info!(balance = ?balance, "Session created");
        Session::new(balance, cst, security_token)
    }

    async fn market_navigation(
        &self,
        session: &Session,
        node_id: &str,
    ) -> Result<Vec<MarketSnapshot>, ApiError> {
        let url = self.config.endpoint(&format!("marketnavigation/{}", node_id));

        let resp = self
            .client
            .get(&url)
            .header(SECURITY_TOKEN_HEADER, session.security_token())
            .header(CST_HEADER, session.cst())
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if resp.status() != StatusCode::OK {
            return Err(Self::partial_failure(resp, node_id).await);
        }

        let data: NavigationResponse = Self::decode(resp, node_id).await?;
        let rows = data
            .markets
            .ok_or_else(|| ApiError::data_shape(node_id, "missing markets"))?;

        let total = rows.len();
        let markets: Vec<MarketSnapshot> = rows
            .into_iter()
            .enumerate()
            .filter_map(|(i, row)| match serde_json::from_value(row) {
                Ok(market) => Some(market),
                Err(e) => {
                    warn!(node_id, index = i, error = %e, "Skipping malformed market");
                    None
                }
            })
            .collect();

        debug!(node_id, count = markets.len(), total, "Fetched navigation node");
        Ok(markets)
    }

    async fn historical_prices(
        &self,
        session: &Session,
        epic: &str,
        resolution: Resolution,
        max_results: usize,
    ) -> Result<Vec<PriceBar>, ApiError> {
        let url = self.config.endpoint(&format!("prices/{}", epic));
        let resource = format!("prices/{}", epic);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("resolution", resolution.as_str().to_string()),
                ("max", max_results.to_string()),
            ])
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(CST_HEADER, session.cst())
            .header(SECURITY_TOKEN_HEADER, session.security_token())
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if resp.status() != StatusCode::OK {
            return Err(Self::partial_failure(resp, &resource).await);
        }

        let data: PricesResponse = Self::decode(resp, &resource).await?;
        let wire = data
            .prices
            .ok_or_else(|| ApiError::data_shape(&resource, "missing prices"))?;

        let bars = wire
            .into_iter()
            .enumerate()
            .map(|(i, bar)| bar.into_bar(i))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|detail| ApiError::data_shape(&resource, detail))?;

        debug!(epic, count = bars.len(), %resolution, "Fetched historical prices");
        Ok(bars)
    }

    fn name(&self) -> &str {
        "Capital.com"
    }
}
