//! Interactive commands read line by line from the terminal.
//!
//! Each line is either a filter edit (`interval 5d`, `refresh 10000`, `letter B`,
//! `change -20`, `price 500`), a request for help, or a request to quit.
//! Keywords are case-insensitive.
use std::str::FromStr;

use crate::error::TrackerError;
use crate::filters::{FilterChange, Interval, Letter, PercentChange, PriceRange, RefreshRate};

/// Short usage text printed by the `help` command.
pub const HELP: &str = "\
Commands:
  interval <1d|5d|1mo|3mo|6mo|1y|5y>
  refresh <3000|5000|10000|15000|20000|30000>
  letter <A-Z>
  change <-100..100>
  price <0..1000>
  help
  quit";

/// A parsed line of interactive input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Edit one filter field.
    Filter(FilterChange),
    /// Print the command summary.
    Help,
    /// Stop the client.
    Quit,
}

impl Command {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse_line(line: &str) -> Result<Option<Command>, TrackerError> {
        if line.trim().is_empty() {
            return Ok(None);
        }
        line.parse().map(Some)
    }
}

impl FromStr for Command {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let keyword = parts
            .next()
            .ok_or_else(|| TrackerError::InvalidCommand("empty line".to_string()))?
            .to_ascii_lowercase();
        let argument = parts.next();
        if let Some(extra) = parts.next() {
            return Err(TrackerError::InvalidCommand(format!("unexpected argument '{}'", extra)));
        }

        let require = |name: &str| {
            argument.ok_or_else(|| TrackerError::InvalidCommand(format!("'{}' needs a value", name)))
        };

        let command = match keyword.as_str() {
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            "interval" => {
                let value = require("interval")?;
                let interval = value
                    .parse::<Interval>()
                    .map_err(|_| TrackerError::InvalidFilter(format!("unknown interval '{}'", value)))?;
                Command::Filter(FilterChange::Interval(interval))
            }
            "refresh" => {
                let value = require("refresh")?;
                let rate = value
                    .parse::<RefreshRate>()
                    .map_err(|_| TrackerError::InvalidFilter(format!("unsupported refresh period '{}'", value)))?;
                Command::Filter(FilterChange::Refresh(rate))
            }
            "letter" => Command::Filter(FilterChange::Letter(require("letter")?.parse::<Letter>()?)),
            "change" => Command::Filter(FilterChange::PercentChange(
                require("change")?.parse::<PercentChange>()?,
            )),
            "price" => Command::Filter(FilterChange::PriceRange(require("price")?.parse::<PriceRange>()?)),
            other => return Err(TrackerError::InvalidCommand(format!("unknown command '{}'", other))),
        };

        if matches!(command, Command::Help | Command::Quit) && argument.is_some() {
            return Err(TrackerError::InvalidCommand(format!("'{}' takes no value", keyword)));
        }
        Ok(command)
    }
}
