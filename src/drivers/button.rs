//! Debounced press-edge detector for the operator override button.
//!
//! ## Hardware
//!
//! Grove push-button modules are active-high; bare switches to a pull-up
//! are active-low.  Either way [`PressDetector::poll`] reports `true` once
//! per physical press, on the released→pressed edge.
//!
//! A level change only counts once it is at least `debounce_ms` after the
//! previous accepted change, which filters contact bounce on both edges.

use embedded_hal::digital::InputPin;

/// Default bounce window.
pub const DEBOUNCE_MS: u64 = 50;

pub struct PressDetector<P> {
    pin: P,
    active_low: bool,
    debounce_ms: u64,
    pressed: bool,
    last_change_ms: Option<u64>,
}

impl<P: InputPin> PressDetector<P> {
    pub fn new(pin: P, active_low: bool) -> Self {
        Self::with_debounce(pin, active_low, DEBOUNCE_MS)
    }

    pub fn with_debounce(pin: P, active_low: bool, debounce_ms: u64) -> Self {
        Self {
            pin,
            active_low,
            debounce_ms,
            pressed: false,
            last_change_ms: None,
        }
    }

    /// Sample the pin.  Returns `true` exactly once per accepted press.
    pub fn poll(&mut self, now_ms: u64) -> Result<bool, P::Error> {
        let level = if self.active_low {
            self.pin.is_low()?
        } else {
            self.pin.is_high()?
        };

        if level == self.pressed {
            return Ok(false);
        }

        let settled = self
            .last_change_ms
            .is_none_or(|at| now_ms.saturating_sub(at) >= self.debounce_ms);
        if !settled {
            return Ok(false);
        }

        self.pressed = level;
        self.last_change_ms = Some(now_ms);
        Ok(level)
    }

    /// Debounced level.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}
