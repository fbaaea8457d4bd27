//! Stock Client — polls a quote endpoint for a fixed set of tickers and renders
//! the results as text cards with sparkline charts.
//!
//! Every cycle sends one `GET` per ticker with the current filters encoded in the
//! query string, waits for all of them, and replaces the displayed quotes only if
//! every request succeeded. Cycles repeat on a timer; editing a filter on stdin
//! restarts the timer with an immediate cycle.
//!
//! Usage example (CLI):
//! ```bash
//! stock_client --endpoint http://127.0.0.1:8000/stocks --interval 5d --refresh 10000
//! ```
//!
//! Type `help` while running for the list of filter commands.
#![warn(missing_docs)]
mod args;
mod input;
mod poller;
mod render;
mod source;
mod state;

use std::io::{self, Write};

use clap::Parser;
use log::{debug, info, warn};
use stock_common::command::{Command, HELP};
use stock_common::{Result, TrackerError};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use crate::args::Args;
use crate::poller::{CycleEvent, Poller};
use crate::render::render;
use crate::source::{HttpQuoteSource, QuoteSource};
use crate::state::{Transition, Update, ViewState};

/// Clears the terminal and moves the cursor home.
const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), TrackerError> {
    init_logger();
    let args = Args::parse();

    let source = HttpQuoteSource::new(&args.endpoint)?;
    info!("Quote endpoint: {}", source.endpoint());

    let (cycle_tx, cycle_rx) = unbounded_channel();
    let poller = Poller::new(source, cycle_tx);
    let mut state = ViewState::new(args.filters());

    if args.once {
        return run_single_cycle(&poller, &mut state, cycle_rx).await;
    }

    let (quit_tx, quit_rx) = unbounded_channel::<()>();
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down client...");
        let _ = quit_tx.send(());
    })
    .map_err(|e| TrackerError::Io(io::Error::other(e.to_string())))?;

    let (line_tx, line_rx) = unbounded_channel();
    input::spawn_stdin_reader(line_tx);

    info!("Client is running. Type 'help' for commands, Ctrl+C to exit.");
    run_event_loop(&poller, &mut state, cycle_rx, line_rx, quit_rx, !args.no_clear).await
}

/// Runs one cycle, prints the resulting frame and reports a failed cycle as an error.
async fn run_single_cycle<S: QuoteSource>(
    poller: &Poller<S>,
    state: &mut ViewState,
    mut cycles: UnboundedReceiver<CycleEvent>,
) -> Result<()> {
    poller.run_once(state.filters()).await;
    while let Ok(event) = cycles.try_recv() {
        state.apply(Update::Cycle(event));
    }
    draw(state, false);
    match &state.status().error {
        Some(message) => Err(TrackerError::CycleFailed(message.clone())),
        None => Ok(()),
    }
}

/// The single-threaded event loop: applies cycle events and user commands to
/// the view state, redraws, and restarts polling when the filters change.
///
/// Returns when a `quit` command or a Ctrl+C arrives. Closing the input only
/// freezes the filters; polling goes on.
async fn run_event_loop<S: QuoteSource>(
    poller: &Poller<S>,
    state: &mut ViewState,
    mut cycles: UnboundedReceiver<CycleEvent>,
    mut lines: UnboundedReceiver<String>,
    mut quit: UnboundedReceiver<()>,
    clear: bool,
) -> Result<()> {
    let mut handle = poller.start(state.filters());
    let mut input_open = true;
    draw(state, clear);

    loop {
        let update = tokio::select! {
            Some(event) = cycles.recv() => Update::Cycle(event),
            line = lines.recv(), if input_open => match line {
                Some(line) => match Command::parse_line(&line) {
                    Ok(Some(Command::Filter(change))) => Update::Filter(change),
                    Ok(Some(Command::Help)) => {
                        println!("{}", HELP);
                        continue;
                    }
                    Ok(Some(Command::Quit)) => break,
                    Ok(None) => continue,
                    Err(e) => {
                        warn!("{}", e);
                        continue;
                    }
                },
                None => {
                    debug!("Input closed, filters are fixed from now on");
                    input_open = false;
                    continue;
                }
            },
            _ = quit.recv() => break,
        };

        match state.apply(update) {
            Transition::Unchanged => {}
            Transition::Redraw => draw(state, clear),
            Transition::RestartPolling => {
                handle.cancel();
                handle = poller.start(state.filters());
                draw(state, clear);
            }
        }
    }

    handle.cancel();
    info!("Client stopped.");
    Ok(())
}

fn draw(state: &ViewState, clear: bool) {
    let mut out = io::stdout().lock();
    if clear {
        let _ = write!(out, "{}", CLEAR_SCREEN);
    }
    let _ = write!(out, "{}", render(state));
    let _ = out.flush();
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use stock_common::filters::Letter;
    use stock_common::{FilterState, QuoteResult, Ticker};
    use tokio::time::sleep;

    #[derive(Default)]
    struct RecordingSource {
        seen: Arc<Mutex<Vec<FilterState>>>,
    }

    impl QuoteSource for RecordingSource {
        fn fetch(&self, filters: &FilterState, _ticker: Ticker) -> impl Future<Output = Result<QuoteResult>> + Send {
            self.seen.lock().unwrap().push(*filters);
            async move {
                Ok(QuoteResult::Data {
                    latest_close: 1.0,
                    history: Vec::new(),
                })
            }
        }
    }

    /// Filters used by each cycle so far, one entry per cycle.
    fn cycles_seen(seen: &Mutex<Vec<FilterState>>) -> Vec<FilterState> {
        seen.lock().unwrap().chunks(Ticker::COUNT).map(|c| c[0]).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn filter_command_restarts_polling_once() {
        let source = RecordingSource::default();
        let seen = Arc::clone(&source.seen);
        let (cycle_tx, cycle_rx) = unbounded_channel();
        let poller = Poller::new(source, cycle_tx);
        let mut state = ViewState::new(FilterState::default());
        let (line_tx, line_rx) = unbounded_channel();
        let (quit_tx, quit_rx) = unbounded_channel();
        let letter_b = Letter::new('B').unwrap();

        let driver = async {
            sleep(Duration::from_millis(100)).await;
            assert_eq!(cycles_seen(&seen).len(), 1);

            line_tx.send("letter B".to_string()).unwrap();
            sleep(Duration::from_millis(100)).await;
            let cycles = cycles_seen(&seen);
            assert_eq!(cycles.len(), 2);
            assert_eq!(cycles[1].letter, letter_b);

            // Same values again, a garbled line and a blank one: no new cycle.
            for line in ["letter b", "interval 1d", "\u{FFFD}\u{FFFD}", ""] {
                line_tx.send(line.to_string()).unwrap();
            }
            sleep(Duration::from_millis(100)).await;
            assert_eq!(cycles_seen(&seen).len(), 2);

            // Timer restarted at 100ms with a 5s period; the first timer would have fired at 5000ms.
            sleep(Duration::from_millis(4750)).await;
            assert_eq!(cycles_seen(&seen).len(), 2);
            sleep(Duration::from_millis(100)).await;
            let cycles = cycles_seen(&seen);
            assert_eq!(cycles.len(), 3);
            assert_eq!(cycles[2].letter, letter_b);

            quit_tx.send(()).unwrap();
        };

        let (result, ()) = tokio::join!(
            run_event_loop(&poller, &mut state, cycle_rx, line_rx, quit_rx, false),
            driver
        );
        assert!(result.is_ok());
        assert_eq!(state.filters().letter, letter_b);
        assert_eq!(state.quotes().len(), Ticker::COUNT);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_input_keeps_polling_until_quit() {
        let source = RecordingSource::default();
        let seen = Arc::clone(&source.seen);
        let (cycle_tx, cycle_rx) = unbounded_channel();
        let poller = Poller::new(source, cycle_tx);
        let mut state = ViewState::new(FilterState::default());
        let (line_tx, line_rx) = unbounded_channel::<String>();
        let (quit_tx, quit_rx) = unbounded_channel();
        drop(line_tx);

        let driver = async {
            sleep(Duration::from_millis(5100)).await;
            assert_eq!(cycles_seen(&seen).len(), 2);
            quit_tx.send(()).unwrap();
        };

        let (result, ()) = tokio::join!(
            run_event_loop(&poller, &mut state, cycle_rx, line_rx, quit_rx, false),
            driver
        );
        assert!(result.is_ok());
    }
}
