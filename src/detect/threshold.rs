//! Light-gate detector.
//!
//! Fires when the intensity changes by more than `delta` between two
//! consecutive valid samples, then stays quiet until a tick whose change is
//! back within `delta`.
//!
//! ## Rolling baseline
//!
//! The baseline is replaced by the current value on *every* evaluated tick,
//! so the detector reacts to per-tick rate of change rather than to distance
//! from a fixed reference.  A slow drift never fires; a fast edge fires even
//! if the level ends up where it started.  Because the comparison spans one
//! tick, changing the sampling cadence changes what counts as a trigger:
//! a faster cadence splits one edge across several smaller deltas.

use crate::sensors::Sample;

#[derive(Debug, Clone)]
pub struct ThresholdDetector {
    delta: f32,
    /// Value of the previous valid sample.  `None` until seeded.
    baseline: Option<f32>,
    armed: bool,
}

impl ThresholdDetector {
    pub fn new(delta: f32) -> Self {
        Self {
            delta,
            baseline: None,
            armed: true,
        }
    }

    pub fn set_delta(&mut self, delta: f32) {
        self.delta = delta;
    }

    /// Forget the baseline; the next valid sample seeds it again.
    pub fn reset(&mut self) {
        self.baseline = None;
        self.armed = true;
    }

    /// Feed one sample; returns `Some(())` when an object passed the gate.
    pub fn evaluate(&mut self, sample: &Sample) -> Option<()> {
        if !sample.valid {
            return None;
        }

        let value = sample.value;
        let Some(baseline) = self.baseline else {
            self.baseline = Some(value);
            return None;
        };

        let fired = if (value - baseline).abs() > self.delta {
            let first = self.armed;
            self.armed = false;
            first
        } else {
            self.armed = true;
            false
        };

        self.baseline = Some(value);
        fired.then_some(())
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn baseline(&self) -> Option<f32> {
        self.baseline
    }
}
