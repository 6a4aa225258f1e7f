//! Streaming wire messages.
//!
//! The client sends a single `marketData.subscribe` frame and then receives
//! JSON frames of the form `{"destination": ..., "payload": {...}}`.

use capital_core::error::ApiError;
use capital_core::types::{QuoteMessage, Session};
use serde::{Deserialize, Serialize};

/// Destination of the subscribe request.
pub const SUBSCRIBE_DESTINATION: &str = "marketData.subscribe";

/// Destination of price updates.
pub const QUOTE_DESTINATION: &str = "quote";

/// Market data subscription request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub destination: String,
    pub correlation_id: String,
    pub cst: String,
    pub security_token: String,
    pub payload: SubscribePayload,
}

/// Epics to subscribe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscribePayload {
    pub epics: Vec<String>,
}

impl SubscribeRequest {
    /// Build a subscription for `epics` using the session's tokens.
    pub fn market_data(
        session: &Session,
        correlation_id: impl Into<String>,
        epics: Vec<String>,
    ) -> Self {
        Self {
            destination: SUBSCRIBE_DESTINATION.to_string(),
            correlation_id: correlation_id.into(),
            cst: session.cst().to_string(),
            security_token: session.security_token().to_string(),
            payload: SubscribePayload { epics },
        }
    }

    /// Encode as a JSON text frame.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode from a JSON text frame.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// A decoded inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Price update
    Quote(QuoteMessage),
    /// Any other destination (subscription acks, pings)
    Other { destination: String },
}

#[derive(Debug, Deserialize)]
struct Envelope {
    destination: Option<String>,
    #[serde(default)]
    payload: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct QuotePayload {
    epic: String,
    bid: f64,
    ofr: f64,
}

/// Decode a text frame.
///
/// Frames without a destination, and quote frames whose payload lacks
/// `epic`, `bid` or `ofr`, are data shape errors.
pub fn decode_frame(text: &str) -> Result<StreamEvent, ApiError> {
    let envelope: Envelope =
        serde_json::from_str(text).map_err(|e| ApiError::data_shape("stream frame", e.to_string()))?;

    let destination = envelope
        .destination
        .ok_or_else(|| ApiError::data_shape("stream frame", "missing destination"))?;

    if destination != QUOTE_DESTINATION {
        return Ok(StreamEvent::Other { destination });
    }

    let payload = envelope
        .payload
        .ok_or_else(|| ApiError::data_shape("quote frame", "missing payload"))?;
    let quote: QuotePayload = serde_json::from_value(payload)
        .map_err(|e| ApiError::data_shape("quote frame", e.to_string()))?;

    Ok(StreamEvent::Quote(QuoteMessage {
        destination,
        epic: quote.epic,
        bid: quote.bid,
        offer: quote.ofr,
    }))
}
