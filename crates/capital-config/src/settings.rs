//! Configuration structures.

use capital_broker::{ClientConfig, ScannerConfig, SpreadFilter, StreamConfig};
use capital_core::types::Resolution;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration and credential errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("missing credential: {0} is not set")]
    MissingCredential(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub scanner: ScannerSettings,
    #[serde(default)]
    pub stream: StreamSettings,
}

impl AppConfig {
    /// Reject settings that would make a run meaningless.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.api.rest_url.is_empty() {
            return Err(SettingsError::Invalid("api.rest_url is empty".into()));
        }
        if self.api.stream_url.is_empty() {
            return Err(SettingsError::Invalid("api.stream_url is empty".into()));
        }
        if self.scanner.categories.is_empty() {
            return Err(SettingsError::Invalid("scanner.categories is empty".into()));
        }
        if self.scanner.max_spread <= Decimal::ZERO {
            return Err(SettingsError::Invalid(
                "scanner.max_spread must be positive".into(),
            ));
        }
        if self.scanner.min_bid < Decimal::ZERO {
            return Err(SettingsError::Invalid(
                "scanner.min_bid must not be negative".into(),
            ));
        }
        if self.scanner.max_results == 0 {
            return Err(SettingsError::Invalid(
                "scanner.max_results must be at least 1".into(),
            ));
        }
        if self.stream.epics.is_empty() {
            return Err(SettingsError::Invalid("stream.epics is empty".into()));
        }
        if let Some(epic) = self
            .stream
            .display
            .iter()
            .find(|epic| !self.stream.epics.contains(epic))
        {
            return Err(SettingsError::Invalid(format!(
                "stream.display epic {} is not in stream.epics",
                epic
            )));
        }
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "capital-scanner".to_string(),
            environment: "demo".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Whether JSON log lines were requested.
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Capital.com endpoint configuration.
///
/// Credentials are never stored here; only the names of the environment
/// variables that hold them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub rest_url: String,
    pub stream_url: String,
    pub request_timeout_secs: Option<u64>,
    pub api_key_env: String,
    pub identifier_env: String,
    pub password_env: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            rest_url: "https://demo-api-capital.backend-capital.com".to_string(),
            stream_url: "wss://api-streaming-capital.backend-capital.com/connect".to_string(),
            request_timeout_secs: None,
            api_key_env: "CAPITAL_API_KEY".to_string(),
            identifier_env: "CAPITAL_IDENTIFIER".to_string(),
            password_env: "CAPITAL_PASSWORD".to_string(),
        }
    }
}

impl ApiSettings {
    /// REST client config for the given API key.
    pub fn client_config(&self, api_key: &str) -> ClientConfig {
        let mut config = ClientConfig::new(self.rest_url.clone(), api_key);
        config.request_timeout = self.request_timeout_secs.map(Duration::from_secs);
        config
    }
}

/// Symbol scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerSettings {
    /// Market navigation node ids
    pub categories: Vec<String>,
    pub max_spread: Decimal,
    pub min_bid: Decimal,
    pub resolution: Resolution,
    /// Bars requested per symbol
    pub max_results: usize,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        let scanner = ScannerConfig::us_shares();
        Self {
            categories: scanner.categories,
            max_spread: scanner.filter.max_spread,
            min_bid: scanner.filter.min_bid,
            resolution: Resolution::Day,
            max_results: 14,
        }
    }
}

impl ScannerSettings {
    /// Scanner config with these categories and thresholds.
    pub fn scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            categories: self.categories.clone(),
            filter: SpreadFilter::new(self.max_spread, self.min_bid),
        }
    }
}

/// Quote stream settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamSettings {
    /// Epics sent in the subscribe frame
    pub epics: Vec<String>,
    /// Epics with a display sink; empty means all subscribed epics
    pub display: Vec<String>,
    pub correlation_id: String,
    /// Stop streaming after this many seconds
    pub duration_secs: Option<u64>,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            epics: vec!["GOLD".to_string(), "US100".to_string()],
            display: Vec::new(),
            correlation_id: "1".to_string(),
            duration_secs: None,
        }
    }
}

impl StreamSettings {
    /// Epics that get a display sink.
    pub fn display_epics(&self) -> &[String] {
        if self.display.is_empty() {
            &self.epics
        } else {
            &self.display
        }
    }

    /// Stream client config for `url`.
    pub fn stream_config(&self, url: &str) -> StreamConfig {
        StreamConfig {
            url: url.to_string(),
            epics: self.epics.clone(),
            correlation_id: self.correlation_id.clone(),
        }
    }
}
