//! Per-ticker quote results as delivered by the quote source.
//!
//! The source answers each request with either `{"latest_close": .., "history": [..]}`
//! or `{"error": ".."}`. Both shapes are modelled by [`QuoteResult`]; the view only
//! renders them.
use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::error::TrackerError;
use crate::tickers::Ticker;

/// One closing price in a ticker's history.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryPoint {
    /// Timestamp label as sent by the source.
    pub time: String,
    /// Closing price.
    pub close: f64,
}

/// Outcome for a single ticker within a cycle.
///
/// A non-empty `error` field always makes the result an error. An empty
/// `error` is treated as absent, so it only stands when there is no
/// `latest_close` to show instead.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawQuote")]
pub enum QuoteResult {
    /// The source could not produce data for this ticker.
    Error {
        /// Message shown inline on the ticker's card.
        error: String,
    },
    /// Priced data.
    Data {
        /// Most recent closing price.
        latest_close: f64,
        /// Closing prices in chronological order.
        history: Vec<HistoryPoint>,
    },
}

/// Wire shape of a per-ticker body before the variant is chosen.
#[derive(Deserialize)]
struct RawQuote {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    latest_close: Option<f64>,
    #[serde(default)]
    history: Vec<HistoryPoint>,
}

impl TryFrom<RawQuote> for QuoteResult {
    type Error = String;

    fn try_from(raw: RawQuote) -> Result<Self, <QuoteResult as TryFrom<RawQuote>>::Error> {
        match (raw.error, raw.latest_close) {
            (Some(error), _) if !error.is_empty() => Ok(QuoteResult::Error { error }),
            (_, Some(latest_close)) => Ok(QuoteResult::Data {
                latest_close,
                history: raw.history,
            }),
            (Some(error), None) => Ok(QuoteResult::Error { error }),
            (None, None) => Err("expected an `error` or a `latest_close` field".to_string()),
        }
    }
}

/// Results of one successful cycle, keyed and ordered by ticker.
pub type QuoteMap = BTreeMap<Ticker, QuoteResult>;

/// Decodes a quote source response body for `ticker`.
///
/// Besides the per-ticker shape, a body keyed by symbol
/// (`{"AAPL": {...}, "MSFT": {...}}`) is accepted; the requested ticker's
/// entry is used and its absence is an error.
pub fn decode_quote_body(ticker: Ticker, body: &[u8]) -> Result<QuoteResult, TrackerError> {
    match serde_json::from_slice::<QuoteResult>(body) {
        Ok(result) => Ok(result),
        Err(direct_err) => {
            let mut keyed: HashMap<String, QuoteResult> = match serde_json::from_slice(body) {
                Ok(keyed) => keyed,
                Err(_) => return Err(TrackerError::SerdeJson(direct_err)),
            };
            keyed
                .remove(&ticker.to_string())
                .ok_or_else(|| TrackerError::TickerNotFound(ticker.to_string()))
        }
    }
}
