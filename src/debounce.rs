//! Debounced dispatch of query states.
//!
//! Keystrokes produce query states faster than they are worth searching.
//! A [`Debouncer`] holds back each new state until input has been quiet for
//! a window, then hands the latest one to the host loop. Results coming
//! back are checked against the newest ticket issued, so a slow search for
//! a superseded state is ignored instead of overwriting a newer one.
//!
//! The coordinator never reads a clock itself: every call takes `now`, which
//! keeps it deterministic under test and usable from any event loop.

use crate::config::EngineConfig;
use crate::types::QueryState;
use std::time::{Duration, Instant};
use tracing::trace;

/// Sequence number of a submitted state. Later submits get larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
  pub fn sequence(self) -> u64 {
    self.0
  }
}

/// A state whose quiet window has elapsed and should now be searched.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch<S> {
  pub ticket: Ticket,
  pub state: S,
}

/// What happened to a completed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
  /// The result belongs to the newest state and is now displayed.
  Rendered,
  /// A newer state was submitted meanwhile; the result was dropped.
  Stale,
}

#[derive(Debug)]
struct Pending<S> {
  ticket: Ticket,
  state: S,
  due: Instant,
}

/// Single-threaded debounce and stale-result coordinator.
///
/// `S` is the submitted state, `R` the rendered result.
#[derive(Debug)]
pub struct Debouncer<S, R> {
  window: Duration,
  issued: u64,
  pending: Option<Pending<S>>,
  displayed: Option<(Ticket, R)>,
}

/// The coordinator used for catalog searches.
pub type SearchCoordinator<R> = Debouncer<QueryState, R>;

impl<S, R> Debouncer<S, R> {
  pub fn new(window: Duration) -> Self {
    Self {
      window,
      issued: 0,
      pending: None,
      displayed: None,
    }
  }

  /// Uses the configured `debounce_ms` as the quiet window.
  pub fn from_config(config: &EngineConfig) -> Self {
    Self::new(config.debounce_window())
  }

  pub fn window(&self) -> Duration {
    self.window
  }

  /// Records a new state, replacing any state still waiting, and restarts
  /// the quiet window.
  pub fn submit(&mut self, state: S, now: Instant) -> Ticket {
    self.schedule(state, now + self.window)
  }

  /// Records a new state that is due right away, e.g. a page change.
  pub fn submit_immediate(&mut self, state: S, now: Instant) -> Ticket {
    self.schedule(state, now)
  }

  fn schedule(&mut self, state: S, due: Instant) -> Ticket {
    self.issued += 1;
    let ticket = Ticket(self.issued);
    if let Some(old) = self.pending.replace(Pending { ticket, state, due }) {
      trace!(superseded = old.ticket.0, by = ticket.0, "state superseded before dispatch");
    }
    ticket
  }

  /// When the host loop should call [`Debouncer::poll`] next.
  pub fn deadline(&self) -> Option<Instant> {
    self.pending.as_ref().map(|p| p.due)
  }

  /// Whether nothing is waiting to be dispatched.
  pub fn is_idle(&self) -> bool {
    self.pending.is_none()
  }

  /// Takes the waiting state once its window has elapsed.
  pub fn poll(&mut self, now: Instant) -> Option<Dispatch<S>> {
    if self.pending.as_ref()?.due > now {
      return None;
    }
    self.pending.take().map(|p| Dispatch {
      ticket: p.ticket,
      state: p.state,
    })
  }

  /// Hands back the result computed for `ticket`.
  ///
  /// Only a result for the newest ticket issued is kept; anything older is
  /// dropped, including results for states that were dispatched but have
  /// since been superseded.
  pub fn complete(&mut self, ticket: Ticket, result: R) -> Delivery {
    let newer_shown = self.displayed.as_ref().is_some_and(|(shown, _)| *shown >= ticket);
    if ticket.0 != self.issued || newer_shown {
      trace!(ticket = ticket.0, latest = self.issued, "discarding stale result");
      return Delivery::Stale;
    }
    self.displayed = Some((ticket, result));
    Delivery::Rendered
  }

  /// The result currently on screen.
  pub fn displayed(&self) -> Option<&R> {
    self.displayed.as_ref().map(|(_, r)| r)
  }

  /// Polls and, if a state is due, runs `search` on it and completes it.
  pub fn run_due(&mut self, now: Instant, search: impl FnOnce(&S) -> R) -> Option<Delivery> {
    let dispatch = self.poll(now)?;
    let result = search(&dispatch.state);
    Some(self.complete(dispatch.ticket, result))
  }
}
