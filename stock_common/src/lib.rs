//!
//! Common types shared by the stock tracker client.
//!
//! This crate aggregates:
//! - `error` — unified error type `TrackerError` used across the workspace.
//! - `result` — handy `Result<T, TrackerError>` alias.
//! - `tickers` — the fixed set of tracked ticker symbols.
//! - `filters` — the user-controlled filter state and its query-string encoding.
//! - `quote` — per-ticker quote results as delivered by the quote source.
//! - `command` — interactive filter commands read from the terminal.
//! - `net` — endpoint and header constants.
#![warn(missing_docs)]
pub mod command;
pub mod error;
pub mod filters;
pub mod net;
pub mod quote;
pub mod result;
pub mod tickers;

pub use command::Command;
pub use error::TrackerError;
pub use filters::{FilterChange, FilterState};
pub use quote::{QuoteMap, QuoteResult};
pub use result::Result;
pub use tickers::Ticker;
