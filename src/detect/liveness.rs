//! Liveness timer: time since the arm last rotated toward an outlet.

use core::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct LivenessTimer {
    last_reset_ms: u64,
}

impl LivenessTimer {
    pub fn new(now_ms: u64) -> Self {
        Self {
            last_reset_ms: now_ms,
        }
    }

    pub fn reset(&mut self, now_ms: u64) {
        self.last_reset_ms = now_ms;
    }

    /// Time since the last reset.  A `now_ms` before the reset yields zero.
    pub fn elapsed_since(&self, now_ms: u64) -> Duration {
        Duration::from_millis(now_ms.saturating_sub(self.last_reset_ms))
    }

    /// `true` once `wait` has fully elapsed.
    pub fn expired(&self, now_ms: u64, wait: Duration) -> bool {
        self.elapsed_since(now_ms) >= wait
    }

    pub fn last_reset_ms(&self) -> u64 {
        self.last_reset_ms
    }
}
