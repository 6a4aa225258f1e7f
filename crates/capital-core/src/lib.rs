//! Core types and traits for the Capital.com client.
//!
//! This crate provides the foundational building blocks including:
//! - Session and credential types
//! - Market navigation, price bar and quote types
//! - The `MarketApi` capability trait shared by both pipelines
//! - The `QuoteSink` presentation seam and indicator traits

pub mod types;
pub mod traits;
pub mod error;

pub use error::{ApiError, IndicatorError};
pub use types::*;
pub use traits::*;
