//! Cancellable quiescence timer for debounced filtering.
//!
//! The timer is polled rather than driven by a callback: the event loop calls
//! [`Debouncer::fire`] on every tick and after every event, passing the current
//! instant. Scheduling again before the deadline cancels the previous request.

use std::time::{Duration, Instant};

use tracing::trace;

/// Default quiescence window in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// A single-slot debounce timer.
///
/// At most one commit is pending at a time; the last request wins.
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// How long input must stay quiet before the pending request fires.
    window: Duration,
    /// When the pending request becomes due, if any.
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create a debouncer with the given quiescence window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Schedule a commit, cancelling any pending one.
    pub fn schedule(&mut self, now: Instant) {
        if self.deadline.is_some() {
            trace!("Debounce restarted");
        }
        self.deadline = Some(now + self.window);
    }

    /// Drop the pending commit, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a commit is waiting.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the pending commit if its deadline has passed.
    ///
    /// Returns true exactly once per scheduled commit.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
