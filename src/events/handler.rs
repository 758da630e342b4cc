//! Event handler implementation.
//!
//! Polls for terminal events and converts them to application events.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind};

use super::Event;
use crate::config::DEFAULT_TICK_RATE_MS;

/// Handles application events by polling crossterm for terminal events.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler with the default tick rate.
    pub fn new() -> Self {
        Self::with_tick_rate(DEFAULT_TICK_RATE_MS)
    }

    /// Create a new event handler with a custom tick rate.
    pub fn with_tick_rate(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Poll for the next event.
    ///
    /// Blocks until an event is available or the tick rate elapses, in which
    /// case `Event::Tick` is returned.
    pub fn next(&self) -> std::io::Result<Event> {
        if event::poll(self.tick_rate)? {
            Ok(convert(event::read()?))
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a crossterm event; anything the picker ignores becomes a tick.
fn convert(event: CrosstermEvent) -> Event {
    match event {
        // Windows reports releases too
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
        CrosstermEvent::Mouse(mouse) => Event::Mouse(mouse),
        CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
        _ => Event::Tick,
    }
}
