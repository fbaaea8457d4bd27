//! Error types shared by the tracker crates.
//!
//! `TrackerError` covers the two failure tiers of a poll cycle (transport and
//! non-success HTTP status), body decoding, and the validation of user input
//! (filter values and interactive commands).
use std::io;

use thiserror::Error;

/// Unified error type for the workspace.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// I/O error originating from the standard library (stdin, terminal).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The request could not be sent or the response body could not be read.
    #[error("{0}")]
    Request(String),

    /// The quote source answered with a non-success status; holds the reason phrase.
    #[error("Server Error: {0}")]
    ServerStatus(String),

    /// Failure while decoding a response body via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// A poll cycle failed as a whole; holds the cycle's error message.
    #[error("Poll cycle failed: {0}")]
    CycleFailed(String),

    /// A keyed response body did not contain the requested ticker.
    #[error("Ticker not found in response: {0}")]
    TickerNotFound(String),

    /// A filter value outside its allowed domain.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// A line of interactive input that is not a known command.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}
