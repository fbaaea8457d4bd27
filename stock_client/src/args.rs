//! Command-line arguments for the stock tracker client.
//!
//! This module defines the CLI interface using `clap`. The filter flags only set
//! the initial state; filters can be changed at runtime from stdin (see `help`).
use clap::Parser;
use stock_common::FilterState;
use stock_common::filters::{Interval, Letter, PercentChange, PriceRange, RefreshRate};
use stock_common::net::DEFAULT_ENDPOINT;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Quote endpoint queried once per ticker per cycle.
    #[clap(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Initial history interval.
    #[clap(long, value_enum, default_value_t = Interval::OneDay)]
    pub interval: Interval,

    /// Initial refresh period in milliseconds.
    #[clap(long, value_enum, default_value_t = RefreshRate::Ms5000)]
    pub refresh: RefreshRate,

    /// Initial alphabetical filter letter.
    #[clap(long, default_value = "A")]
    pub letter: Letter,

    /// Initial percent-change threshold (-100..=100).
    #[clap(long, default_value = "0", allow_negative_numbers = true)]
    pub percent_change: PercentChange,

    /// Initial upper bound of the price range (0..=1000).
    #[clap(long, default_value = "1000")]
    pub price_range: PriceRange,

    /// Run a single cycle, print the view and exit.
    #[clap(long)]
    pub once: bool,

    /// Do not clear the terminal between frames.
    #[clap(long)]
    pub no_clear: bool,
}

impl Args {
    /// Filter state the client starts with.
    pub fn filters(&self) -> FilterState {
        FilterState {
            interval: self.interval,
            refresh: self.refresh,
            letter: self.letter,
            percent_change: self.percent_change,
            price_range: self.price_range,
        }
    }
}
