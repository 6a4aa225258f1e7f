//! Error types for the Capital.com client.

use thiserror::Error;

/// Errors raised while talking to the trading API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Session creation was rejected or returned no tokens.
    #[error("Authentication failed: {0}")]
    AuthFailure(String),

    /// A single category or symbol request returned a non-success status.
    #[error("Request for {resource} failed with status {status}: {body}")]
    PartialFetch {
        resource: String,
        status: u16,
        body: String,
    },

    /// A response was missing a field the client depends on.
    #[error("Unexpected response for {resource}: {detail}")]
    DataShape { resource: String, detail: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),
}

impl ApiError {
    /// Build a data shape error for `resource`.
    pub fn data_shape(resource: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::DataShape {
            resource: resource.into(),
            detail: detail.into(),
        }
    }

    /// Whether the error aborts a REST polling run.
    ///
    /// Partial fetch and data shape failures are isolated to one category or
    /// symbol; everything else stops the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::PartialFetch { .. } | Self::DataShape { .. })
    }
}

/// Indicator calculation errors.
#[derive(Error, Debug, PartialEq)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },
}
