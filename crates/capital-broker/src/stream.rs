//! Websocket quote stream client.

use capital_core::error::ApiError;
use capital_core::traits::QuoteSink;
use capital_core::types::{QuoteMessage, Session};
use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::messages::{decode_frame, StreamEvent, SubscribeRequest, SUBSCRIBE_DESTINATION};

/// Stream client configuration.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Websocket URL, e.g. `wss://api-streaming-capital.backend-capital.com/connect`
    pub url: String,
    /// Epics sent in the subscribe frame
    pub epics: Vec<String>,
    pub correlation_id: String,
}

/// Connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Disconnected,
    Connected,
    Subscribed,
    Streaming,
}

/// How a stream run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The cancellation token fired
    Cancelled,
    /// The server sent a close frame or the socket reached EOF
    ClosedByServer,
}

/// Counters for one stream run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    pub end: StreamEnd,
    pub frames: u64,
    pub quotes_displayed: u64,
}

/// Routes quotes to the sink registered for their epic.
#[derive(Default)]
pub struct QuoteRouter {
    sinks: HashMap<String, Box<dyn QuoteSink>>,
}

impl QuoteRouter {
    /// Create an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the display sink for `epic`, replacing any previous one.
    pub fn register(&mut self, epic: impl Into<String>, sink: impl QuoteSink + 'static) {
        self.sinks.insert(epic.into(), Box::new(sink));
    }

    /// Whether `epic` has a sink.
    pub fn is_watched(&self, epic: &str) -> bool {
        self.sinks.contains_key(epic)
    }

    /// Epics with a registered sink.
    pub fn epics(&self) -> impl Iterator<Item = &str> {
        self.sinks.keys().map(String::as_str)
    }

    /// Deliver a quote; returns `false` when no sink is registered for it.
    pub fn dispatch(&mut self, quote: &QuoteMessage) -> bool {
        match self.sinks.get_mut(&quote.epic) {
            Some(sink) => {
                sink.display(quote);
                true
            }
            None => false,
        }
    }
}

/// Single-connection quote streamer.
///
/// Subscribes once, then decodes frames until cancelled, closed, or a frame
/// fails to decode. There is no reconnect: every exit path leaves the client
/// `Disconnected`.
pub struct QuoteStreamClient {
    config: StreamConfig,
    router: QuoteRouter,
    state: StreamState,
    frames: u64,
    quotes_displayed: u64,
}

impl QuoteStreamClient {
    /// Create a new stream client.
    pub fn new(config: StreamConfig, router: QuoteRouter) -> Self {
        Self {
            config,
            router,
            state: StreamState::Disconnected,
            frames: 0,
            quotes_displayed: 0,
        }
    }

    /// Current connection state.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Connect, subscribe, and stream until `cancel` fires or the socket ends.
    pub async fn run(
        &mut self,
        session: &Session,
        cancel: CancellationToken,
    ) -> Result<StreamSummary, ApiError> {
        let result = self.connect_and_run(session, &cancel).await;
        self.state = StreamState::Disconnected;

        let end = result?;
        info!(
            ?end,
            frames = self.frames,
            quotes = self.quotes_displayed,
            "Quote stream finished"
        );

        Ok(StreamSummary {
            end,
            frames: self.frames,
            quotes_displayed: self.quotes_displayed,
        })
    }

    async fn connect_and_run(
        &mut self,
        session: &Session,
        cancel: &CancellationToken,
    ) -> Result<StreamEnd, ApiError> {
        info!(url = %self.config.url, "Connecting to quote stream");

        let (ws_stream, _response) = tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(StreamEnd::Cancelled),
            connected = connect_async(self.config.url.as_str()) => {
                connected.map_err(|e| ApiError::WebSocket(e.to_string()))?
            }
        };
        self.state = StreamState::Connected;

        let (mut write, mut read) = ws_stream.split();

        let request = SubscribeRequest::market_data(
            session,
            self.config.correlation_id.clone(),
            self.config.epics.clone(),
        );
        let json = request
            .to_json()
            .map_err(|e| ApiError::WebSocket(format!("failed to serialize subscribe: {}", e)))?;
        write
            .send(Message::Text(json))
            .await
            .map_err(|e| ApiError::WebSocket(e.to_string()))?;

        self.state = StreamState::Subscribed;
        info!(epics = ?self.config.epics, "Subscribed to market data");

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!("Quote stream cancelled");
                    return Ok(StreamEnd::Cancelled);
                }
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            self.handle_text(&text)?;
                        }
                        Some(Ok(Message::Close(frame))) => {
                            info!(?frame, "Server sent close frame");
                            return Ok(StreamEnd::ClosedByServer);
                        }
                        Some(Ok(_)) => {
                            // Ping/pong and binary frames carry no quotes
                        }
                        Some(Err(e)) => {
                            return Err(ApiError::WebSocket(e.to_string()));
                        }
                        None => {
                            info!("WebSocket stream ended");
                            return Ok(StreamEnd::ClosedByServer);
                        }
                    }
                }
            }
        }
    }

    /// Decode one text frame and dispatch it.
    ///
    /// Returns whether a sink displayed the frame. A decode failure is
    /// returned as an error and ends the stream.
    pub fn handle_text(&mut self, text: &str) -> Result<bool, ApiError> {
        self.frames += 1;
        if self.state == StreamState::Subscribed {
            self.state = StreamState::Streaming;
        }

        match decode_frame(text)? {
            StreamEvent::Quote(quote) => {
                if self.router.dispatch(&quote) {
                    self.quotes_displayed += 1;
                    Ok(true)
                } else {
                    debug!(epic = %quote.epic, "Quote for unwatched epic");
                    Ok(false)
                }
            }
            StreamEvent::Other { destination } => {
                if destination == SUBSCRIBE_DESTINATION {
                    debug!(frame = %text, "Subscription acknowledged");
                } else {
                    debug!(%destination, "Ignoring frame");
                }
                Ok(false)
            }
        }
    }
}
