//! Text rendering of the view state.
//!
//! Rendering is split in two steps: [`view_model`] decides what each card shows,
//! and the `Display` impls turn that into terminal text. Tests assert on the view
//! model; the event loop prints [`render`].
use std::fmt;

use stock_common::quote::HistoryPoint;
use stock_common::{QuoteResult, Ticker};

use crate::state::ViewState;

/// Heading printed above the cards.
pub const TITLE: &str = "Real-Time Stock Tracker";
/// Shown instead of cards when no cycle has succeeded yet.
pub const NO_DATA: &str = "No stock data available.";
/// Shown on a card whose history is empty.
pub const NO_HISTORY: &str = "No historical data available.";
/// Shown on every data card while a cycle is running.
pub const LOADING: &str = "Loading...";

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Closing prices of one ticker in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    points: Vec<(String, f64)>,
}

impl LineChart {
    /// Builds a chart from history; `None` when there is nothing to plot.
    pub fn from_history(history: &[HistoryPoint]) -> Option<Self> {
        if history.is_empty() {
            return None;
        }
        let points = history.iter().map(|p| (p.time.clone(), p.close)).collect();
        Some(Self { points })
    }

    /// The `(time, close)` pairs, oldest first.
    pub fn points(&self) -> &[(String, f64)] {
        &self.points
    }

    /// One block character per point, scaled between the lowest and highest close.
    pub fn sparkline(&self) -> String {
        let (min, max) = self
            .points()
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, c)| (lo.min(*c), hi.max(*c)));
        let span = max - min;
        let top = (SPARK_LEVELS.len() - 1) as f64;

        self.points
            .iter()
            .map(|(_, close)| {
                if span.abs() < f64::EPSILON || !span.is_finite() {
                    SPARK_LEVELS[SPARK_LEVELS.len() / 2 - 1]
                } else {
                    let level = ((close - min) / span * top).round() as usize;
                    SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
                }
            })
            .collect()
    }
}

impl fmt::Display for LineChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sparkline())?;
        match (self.points.first(), self.points.last()) {
            (Some((first, _)), Some((last, _))) if self.points.len() > 1 => write!(f, "  {} .. {}", first, last),
            (Some((only, _)), _) => write!(f, "  {}", only),
            _ => Ok(()),
        }
    }
}

/// What a single card shows below its title.
#[derive(Debug, Clone, PartialEq)]
pub enum CardBody {
    /// The source reported an error for this ticker.
    TickerError(String),
    /// A cycle is running.
    Loading,
    /// The last cycle failed; its message.
    GlobalError(String),
    /// Priced data, with a chart when history is non-empty.
    Quote {
        /// Most recent closing price.
        latest_close: f64,
        /// `None` renders the no-history fallback.
        chart: Option<LineChart>,
    },
}

/// One ticker's card.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Card title.
    pub ticker: Ticker,
    /// Card content.
    pub body: CardBody,
}

/// The whole view below the header.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewModel {
    /// No quotes yet.
    Empty,
    /// One card per ticker, in ticker order.
    Cards(Vec<Card>),
}

/// Decides what every card shows.
///
/// A ticker error always wins; otherwise loading, then the global error, then the data.
pub fn view_model(state: &ViewState) -> ViewModel {
    if state.quotes().is_empty() {
        return ViewModel::Empty;
    }
    let status = state.status();
    let cards = state
        .quotes()
        .iter()
        .map(|(ticker, result)| {
            let body = match (result, status.loading, &status.error) {
                (QuoteResult::Error { error }, _, _) => CardBody::TickerError(error.clone()),
                (QuoteResult::Data { .. }, true, _) => CardBody::Loading,
                (QuoteResult::Data { .. }, false, Some(error)) => CardBody::GlobalError(error.clone()),
                (QuoteResult::Data { latest_close, history }, false, None) => CardBody::Quote {
                    latest_close: *latest_close,
                    chart: LineChart::from_history(history),
                },
            };
            Card { ticker: *ticker, body }
        })
        .collect();
    ViewModel::Cards(cards)
}

impl fmt::Display for CardBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardBody::TickerError(error) => write!(f, "  {}", error),
            CardBody::Loading => write!(f, "  {}", LOADING),
            CardBody::GlobalError(error) => write!(f, "  ! {}", error),
            CardBody::Quote { latest_close, chart } => {
                writeln!(f, "  Latest Close: {}", latest_close)?;
                match chart {
                    Some(chart) => write!(f, "  {}", chart),
                    None => write!(f, "  {}", NO_HISTORY),
                }
            }
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.ticker)?;
        write!(f, "{}", self.body)
    }
}

impl fmt::Display for ViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewModel::Empty => write!(f, "{}", NO_DATA),
            ViewModel::Cards(cards) => {
                for (i, card) in cards.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                        writeln!(f)?;
                    }
                    write!(f, "{}", card)?;
                }
                Ok(())
            }
        }
    }
}

/// Full frame: title, active filters, last update time and the cards.
pub fn render(state: &ViewState) -> String {
    let updated = state
        .last_updated()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    format!(
        "{}\n{}\nLast updated: {}\n\n{}\n",
        TITLE,
        state.filters(),
        updated,
        view_model(state)
    )
}
