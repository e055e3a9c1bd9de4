//! Event handling for the TUI application.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;

/// Terminal events that the application can handle.
#[derive(Debug)]
pub enum Event {
    /// Key press
    Key(KeyEvent),
    /// Nothing happened within the tick
    Tick,
    Resize(u16, u16),
}

/// Event handler that polls for terminal events.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Wait up to one tick for the next event.
    ///
    /// Key releases and repeats reported by some terminals are folded into
    /// `Tick` so every physical press is handled once.
    pub fn next(&self) -> std::io::Result<Event> {
        if !event::poll(self.tick_rate)? {
            return Ok(Event::Tick);
        }
        match event::read()? {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
            CrosstermEvent::Resize(w, h) => Ok(Event::Resize(w, h)),
            _ => Ok(Event::Tick),
        }
    }
}
