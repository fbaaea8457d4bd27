//! The fixed set of ticker symbols the tracker polls.

use strum_macros::{Display, EnumIter, EnumString};

/// Symbols polled on every cycle, in display order.
///
/// The derived `Ord` follows declaration order, so a `QuoteMap` keyed by
/// `Ticker` iterates in the same order the cards are shown.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    Display,
    EnumString,
    EnumIter,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
)]
#[strum(ascii_case_insensitive)]
pub enum Ticker {
    AAPL,
    GOOGL,
    MSFT,
    TSLA,
    META,
    NVDA,
    AMZN,
    AMD,
    RIVN,
    NFLX,
    GIS,
    GM,
    K,
    BA,
    DIS,
    SBUX,
}

impl Ticker {
    /// Number of tracked symbols.
    pub const COUNT: usize = 16;
}
