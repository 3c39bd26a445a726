//! Rotary edge detector for the dispensing arm.
//!
//! ```text
//!   0°        low            high        360°
//!   ├──── A ───┤── neutral ───┤──── B ────┤
//! ```
//!
//! The first tick inside a band emits that band's direction; further ticks
//! in the same band are suppressed until the arm returns to neutral.  A jump
//! straight from one band into the other starts a new excursion.

use crate::app::events::Destination;
use crate::sensors::Sample;

#[derive(Debug, Clone)]
pub struct EdgeDetector {
    low_deg: f32,
    high_deg: f32,
    /// Band that already fired for the current excursion.  `None` = armed.
    latched: Option<Destination>,
}

impl EdgeDetector {
    pub fn new(low_deg: f32, high_deg: f32) -> Self {
        Self {
            low_deg,
            high_deg,
            latched: None,
        }
    }

    /// Swap thresholds without disturbing the current latch.
    pub fn set_thresholds(&mut self, low_deg: f32, high_deg: f32) {
        self.low_deg = low_deg;
        self.high_deg = high_deg;
    }

    /// Which band `degrees` falls in, if any.
    pub fn classify(&self, degrees: f32) -> Option<Destination> {
        if degrees < self.low_deg {
            Some(Destination::A)
        } else if degrees > self.high_deg {
            Some(Destination::B)
        } else {
            None
        }
    }

    /// Feed one sample; returns the direction on the first tick of an excursion.
    pub fn evaluate(&mut self, sample: &Sample) -> Option<Destination> {
        if !sample.valid {
            return None;
        }

        match self.classify(sample.value) {
            None => {
                self.latched = None;
                None
            }
            Some(band) if self.latched == Some(band) => None,
            Some(band) => {
                self.latched = Some(band);
                Some(band)
            }
        }
    }

    /// `true` when the next band entry will emit.
    pub fn is_armed(&self) -> bool {
        self.latched.is_none()
    }

    /// Band that fired for the current excursion.
    pub fn latched(&self) -> Option<Destination> {
        self.latched
    }
}
