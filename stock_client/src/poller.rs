//! Poll cycles and the repeating poll timer.
//!
//! A cycle fetches every tracked ticker concurrently and either yields a complete
//! `QuoteMap` or fails as a whole on the first error. Cycles are driven by a
//! timer task owned by a [`PollHandle`]; cancelling the handle stops the timer
//! but leaves cycles that are already in flight running to completion.
//!
//! Cycles report progress as [`CycleEvent`]s over an unbounded channel. The event
//! loop is the only place those events are applied to the view state.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::future::try_join_all;
use log::{debug, error, info};
use stock_common::{FilterState, QuoteMap, Result, Ticker, TrackerError};
use strum::IntoEnumIterator;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use crate::source::QuoteSource;

/// Progress of one poll cycle. `seq` increases with every cycle started by a `Poller`.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleEvent {
    /// The cycle has issued its requests.
    Started { seq: u64 },
    /// Every request succeeded.
    Succeeded { seq: u64, quotes: QuoteMap },
    /// At least one request failed; nothing from this cycle should be applied.
    Failed { seq: u64, message: String },
    /// Always the last event of a cycle.
    Finished { seq: u64 },
}

/// Runs one cycle: one request per ticker, all in flight at once.
///
/// Fails fast on the first error; no partial map is ever returned.
pub async fn poll_once<S: QuoteSource>(source: &S, filters: &FilterState) -> Result<QuoteMap> {
    let requests = Ticker::iter().map(move |ticker| async move {
        let result = source.fetch(filters, ticker).await?;
        Ok::<_, TrackerError>((ticker, result))
    });
    let results = try_join_all(requests).await?;
    Ok(results.into_iter().collect())
}

/// Starts poll timers and numbers the cycles they produce.
pub struct Poller<S> {
    source: Arc<S>,
    events: UnboundedSender<CycleEvent>,
    next_seq: Arc<AtomicU64>,
}

impl<S: QuoteSource> Poller<S> {
    /// Creates a poller that reports cycles on `events`.
    pub fn new(source: S, events: UnboundedSender<CycleEvent>) -> Self {
        Self {
            source: Arc::new(source),
            events,
            next_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Starts a timer that runs a cycle immediately and then every `filters.refresh`.
    ///
    /// The returned handle owns the timer; dropping it cancels the timer.
    pub fn start(&self, filters: FilterState) -> PollHandle {
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        let next_seq = Arc::clone(&self.next_seq);
        let period = filters.refresh.as_duration();

        info!("Polling every {}ms with {}", period.as_millis(), filters);
        let task = tokio::spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                if events.is_closed() {
                    debug!("Cycle receiver dropped, poll timer stopping");
                    break;
                }
                let seq = next_seq.fetch_add(1, Ordering::SeqCst) + 1;
                tokio::spawn(run_cycle(Arc::clone(&source), filters, seq, events.clone()));
            }
        });
        PollHandle { task }
    }

    /// Runs a single numbered cycle on the current task, outside any timer.
    pub async fn run_once(&self, filters: FilterState) {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        run_cycle(Arc::clone(&self.source), filters, seq, self.events.clone()).await;
    }
}

/// Handle to a running poll timer.
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stops the timer. Cycles already in flight are not affected.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Emits `Finished` when dropped, so the loading flag is cleared on every exit path.
struct FinishGuard {
    seq: u64,
    events: UnboundedSender<CycleEvent>,
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        let _ = self.events.send(CycleEvent::Finished { seq: self.seq });
    }
}

async fn run_cycle<S: QuoteSource>(
    source: Arc<S>,
    filters: FilterState,
    seq: u64,
    events: UnboundedSender<CycleEvent>,
) {
    let _finish = FinishGuard {
        seq,
        events: events.clone(),
    };
    debug!("Cycle {} started", seq);
    let _ = events.send(CycleEvent::Started { seq });

    let event = match poll_once(source.as_ref(), &filters).await {
        Ok(quotes) => {
            debug!("Cycle {} fetched {} tickers", seq, quotes.len());
            CycleEvent::Succeeded { seq, quotes }
        }
        Err(e) => {
            error!("Cycle {} failed: {}", seq, e);
            CycleEvent::Failed {
                seq,
                message: e.to_string(),
            }
        }
    };
    let _ = events.send(event);
}
