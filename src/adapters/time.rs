//! Monotonic clock adapter.
//!
//! Wraps `std::time::Instant` so the controller, the sensor monitors and
//! the button poller all measure from the same origin.

use std::time::Instant;

use crate::app::ports::TimePort;

/// Milliseconds since the clock was created.  Copies share the origin.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl TimePort for MonotonicClock {
    fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
