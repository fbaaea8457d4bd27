//! View state container.
//!
//! All mutations go through [`ViewState::apply`], called only from the event
//! loop. The returned [`Transition`] tells the loop whether to redraw or to
//! restart polling.
use chrono::{DateTime, Local};
use log::warn;
use stock_common::{FilterChange, FilterState, QuoteMap};

use crate::poller::CycleEvent;

/// Loading/error status of the most recent cycle, global to the whole view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewStatus {
    /// A cycle has started and not yet finished.
    pub loading: bool,
    /// Message of the last failed cycle, cleared when the next cycle starts.
    pub error: Option<String>,
}

/// Input to [`ViewState::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// The user edited a filter.
    Filter(FilterChange),
    /// A poll cycle made progress.
    Cycle(CycleEvent),
}

/// What the event loop has to do after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing visible changed.
    Unchanged,
    /// Redraw the view.
    Redraw,
    /// Filters changed: cancel the current timer, start a new one and redraw.
    RestartPolling,
}

/// Everything the view renders.
#[derive(Debug, Clone)]
pub struct ViewState {
    filters: FilterState,
    quotes: QuoteMap,
    status: ViewStatus,
    last_updated: Option<DateTime<Local>>,
    last_applied_seq: u64,
}

impl ViewState {
    /// Empty view, loading, with the given filters.
    pub fn new(filters: FilterState) -> Self {
        Self {
            filters,
            quotes: QuoteMap::new(),
            status: ViewStatus {
                loading: true,
                error: None,
            },
            last_updated: None,
            last_applied_seq: 0,
        }
    }

    /// Current filters.
    pub fn filters(&self) -> FilterState {
        self.filters
    }

    /// Quotes of the last successful cycle.
    pub fn quotes(&self) -> &QuoteMap {
        &self.quotes
    }

    /// Loading/error status.
    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    /// When the quote map was last replaced.
    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    /// Applies one update.
    pub fn apply(&mut self, update: Update) -> Transition {
        match update {
            Update::Filter(change) => {
                if self.filters.apply(change) {
                    Transition::RestartPolling
                } else {
                    Transition::Unchanged
                }
            }
            Update::Cycle(CycleEvent::Started { .. }) => {
                self.status.loading = true;
                self.status.error = None;
                Transition::Redraw
            }
            Update::Cycle(CycleEvent::Succeeded { seq, quotes }) => {
                // Overlapping cycles are not sequenced: the last to resolve wins.
                if seq < self.last_applied_seq {
                    warn!(
                        "Cycle {} resolved after cycle {} and overwrites its quotes",
                        seq, self.last_applied_seq
                    );
                }
                self.quotes = quotes;
                self.last_applied_seq = seq;
                self.last_updated = Some(Local::now());
                Transition::Redraw
            }
            Update::Cycle(CycleEvent::Failed { message, .. }) => {
                self.status.error = Some(message);
                Transition::Redraw
            }
            Update::Cycle(CycleEvent::Finished { .. }) => {
                self.status.loading = false;
                Transition::Redraw
            }
        }
    }
}
