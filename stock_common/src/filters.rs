//! User-controlled filters sent with every quote request.
//!
//! `FilterState` holds one value per control. Every value is validated on
//! construction, so a `FilterState` always encodes a request the quote source
//! accepts. Changing any field through [`FilterState::apply`] reports whether the
//! value actually changed; only a real change restarts polling.
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use clap::ValueEnum;
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::TrackerError;
use crate::tickers::Ticker;

/// History window requested from the quote source.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Interval {
    #[default]
    #[strum(serialize = "1d")]
    #[value(name = "1d")]
    OneDay,
    #[strum(serialize = "5d")]
    #[value(name = "5d")]
    FiveDays,
    #[strum(serialize = "1mo")]
    #[value(name = "1mo")]
    OneMonth,
    #[strum(serialize = "3mo")]
    #[value(name = "3mo")]
    ThreeMonths,
    #[strum(serialize = "6mo")]
    #[value(name = "6mo")]
    SixMonths,
    #[strum(serialize = "1y")]
    #[value(name = "1y")]
    OneYear,
    #[strum(serialize = "5y")]
    #[value(name = "5y")]
    FiveYears,
}

/// Period of the repeating poll timer.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Display, EnumString, EnumIter)]
pub enum RefreshRate {
    #[strum(serialize = "3000")]
    #[value(name = "3000")]
    Ms3000,
    #[default]
    #[strum(serialize = "5000")]
    #[value(name = "5000")]
    Ms5000,
    #[strum(serialize = "10000")]
    #[value(name = "10000")]
    Ms10000,
    #[strum(serialize = "15000")]
    #[value(name = "15000")]
    Ms15000,
    #[strum(serialize = "20000")]
    #[value(name = "20000")]
    Ms20000,
    #[strum(serialize = "30000")]
    #[value(name = "30000")]
    Ms30000,
}

impl RefreshRate {
    /// Timer period in milliseconds.
    pub fn as_millis(self) -> u64 {
        match self {
            RefreshRate::Ms3000 => 3_000,
            RefreshRate::Ms5000 => 5_000,
            RefreshRate::Ms10000 => 10_000,
            RefreshRate::Ms15000 => 15_000,
            RefreshRate::Ms20000 => 20_000,
            RefreshRate::Ms30000 => 30_000,
        }
    }

    /// Timer period as a `Duration`.
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.as_millis())
    }
}

/// Alphabetical filter: a single upper-case ASCII letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Letter(char);

impl Letter {
    /// Builds a letter from any ASCII alphabetic character, normalised to upper case.
    pub fn new(c: char) -> Result<Self, TrackerError> {
        if c.is_ascii_alphabetic() {
            Ok(Letter(c.to_ascii_uppercase()))
        } else {
            Err(TrackerError::InvalidFilter(format!("letter must be A-Z, got '{}'", c)))
        }
    }

    /// The upper-case character.
    pub fn as_char(self) -> char {
        self.0
    }
}

impl Default for Letter {
    fn default() -> Self {
        Letter('A')
    }
}

impl FromStr for Letter {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Letter::new(c),
            _ => Err(TrackerError::InvalidFilter(format!(
                "letter must be a single character A-Z, got '{}'",
                s.trim()
            ))),
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Percent-change threshold in `[-100, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PercentChange(i32);

impl PercentChange {
    /// Smallest accepted value.
    pub const MIN: i32 = -100;
    /// Largest accepted value.
    pub const MAX: i32 = 100;

    /// Validates `value` against `[MIN, MAX]`.
    pub fn new(value: i32) -> Result<Self, TrackerError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(PercentChange(value))
        } else {
            Err(TrackerError::InvalidFilter(format!(
                "percent change must be within {}..={}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )))
        }
    }

    /// The threshold value.
    pub fn value(self) -> i32 {
        self.0
    }
}

impl FromStr for PercentChange {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i32>()
            .map_err(|e| TrackerError::InvalidFilter(format!("percent change '{}': {}", s.trim(), e)))?;
        PercentChange::new(value)
    }
}

impl fmt::Display for PercentChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Upper bound of the price range, in `[0, 1000]`. The lower bound is always 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PriceRange(u32);

impl PriceRange {
    /// Largest accepted upper bound.
    pub const MAX: u32 = 1000;

    /// Validates `value` against `[0, MAX]`.
    pub fn new(value: u32) -> Result<Self, TrackerError> {
        if value <= Self::MAX {
            Ok(PriceRange(value))
        } else {
            Err(TrackerError::InvalidFilter(format!(
                "price range must be within 0..={}, got {}",
                Self::MAX,
                value
            )))
        }
    }

    /// The upper bound.
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        PriceRange(Self::MAX)
    }
}

impl FromStr for PriceRange {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u32>()
            .map_err(|e| TrackerError::InvalidFilter(format!("price range '{}': {}", s.trim(), e)))?;
        PriceRange::new(value)
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single-field edit of the filter state.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChange {
    Interval(Interval),
    Refresh(RefreshRate),
    Letter(Letter),
    PercentChange(PercentChange),
    PriceRange(PriceRange),
}

/// Complete filter state of the view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterState {
    /// History window.
    pub interval: Interval,
    /// Poll period.
    pub refresh: RefreshRate,
    /// Alphabetical filter.
    pub letter: Letter,
    /// Percent-change threshold.
    pub percent_change: PercentChange,
    /// Upper price bound.
    pub price_range: PriceRange,
}

impl FilterState {
    /// Query parameters for one ticker's request, in wire order.
    pub fn query_pairs(&self, ticker: Ticker) -> [(&'static str, String); 5] {
        [
            ("interval", self.interval.to_string()),
            ("ticker", ticker.to_string()),
            ("alphabetical", self.letter.to_string()),
            ("percentChange", self.percent_change.to_string()),
            ("priceRange", self.price_range.to_string()),
        ]
    }

    /// Applies one edit. Returns `true` when the state actually changed.
    pub fn apply(&mut self, change: FilterChange) -> bool {
        let before = *self;
        match change {
            FilterChange::Interval(v) => self.interval = v,
            FilterChange::Refresh(v) => self.refresh = v,
            FilterChange::Letter(v) => self.letter = v,
            FilterChange::PercentChange(v) => self.percent_change = v,
            FilterChange::PriceRange(v) => self.price_range = v,
        }
        before != *self
    }
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "interval={} refresh={}ms letter={} change={}% price=0..{}",
            self.interval,
            self.refresh.as_millis(),
            self.letter,
            self.percent_change,
            self.price_range
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_encode_every_filter() {
        let filters = FilterState {
            interval: Interval::OneDay,
            refresh: RefreshRate::Ms5000,
            letter: Letter::new('a').unwrap(),
            percent_change: PercentChange::new(-15).unwrap(),
            price_range: PriceRange::new(500).unwrap(),
        };

        let pairs = filters.query_pairs(Ticker::AAPL);
        let rendered: Vec<String> = pairs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        assert_eq!(
            rendered.join("&"),
            "interval=1d&ticker=AAPL&alphabetical=A&percentChange=-15&priceRange=500"
        );
    }

    #[test]
    fn interval_round_trips_wire_names() {
        for (name, interval) in [("1d", Interval::OneDay), ("3mo", Interval::ThreeMonths), ("5y", Interval::FiveYears)] {
            assert_eq!(name.parse::<Interval>().unwrap(), interval);
            assert_eq!(interval.to_string(), name);
        }
        assert!("2w".parse::<Interval>().is_err());
    }

    #[test]
    fn refresh_rate_durations() {
        assert_eq!(RefreshRate::default().as_duration(), Duration::from_secs(5));
        assert_eq!("30000".parse::<RefreshRate>().unwrap().as_millis(), 30_000);
        assert!("4000".parse::<RefreshRate>().is_err());
    }

    #[test]
    fn bounded_values_reject_out_of_range() {
        assert!(PercentChange::new(100).is_ok());
        assert!(PercentChange::new(-100).is_ok());
        assert!(PercentChange::new(101).is_err());
        assert!("-101".parse::<PercentChange>().is_err());
        assert!(PriceRange::new(1000).is_ok());
        assert!(PriceRange::new(1001).is_err());
        assert!("abc".parse::<PriceRange>().is_err());
        assert!("AB".parse::<Letter>().is_err());
        assert!("7".parse::<Letter>().is_err());
        assert_eq!("q".parse::<Letter>().unwrap().as_char(), 'Q');
    }

    #[test]
    fn apply_reports_only_real_changes() {
        let mut filters = FilterState::default();
        assert!(!filters.apply(FilterChange::Interval(Interval::OneDay)));
        assert!(filters.apply(FilterChange::Interval(Interval::FiveDays)));
        assert_eq!(filters.interval, Interval::FiveDays);
        assert!(filters.apply(FilterChange::Refresh(RefreshRate::Ms10000)));
        assert!(!filters.apply(FilterChange::Refresh(RefreshRate::Ms10000)));
        assert!(filters.apply(FilterChange::PriceRange(PriceRange::new(250).unwrap())));
        assert_eq!(filters.price_range.value(), 250);
    }
}
