//! Capital.com REST and streaming integration.

mod client;
mod messages;
mod scanner;
mod stream;

pub use client::{CapitalClient, ClientConfig};
pub use messages::{decode_frame, StreamEvent, SubscribePayload, SubscribeRequest};
pub use scanner::{ScannerConfig, SpreadFilter, SymbolScanner};
pub use stream::{QuoteRouter, QuoteStreamClient, StreamConfig, StreamEnd, StreamState, StreamSummary};
