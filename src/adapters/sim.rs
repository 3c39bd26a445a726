//! Simulated analog inputs for bench runs without a GrovePi hat.
//!
//! The arm idles in the neutral band, swings toward an outlet, and comes
//! back.  Each gate sits at a steady ambient level with a little noise and
//! now and then dips sharply while an object passes.  Both produce raw
//! 10-bit readings so they go through the same sensor conversions as the
//! real hardware.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::app::events::Destination;
use crate::error::SensorError;
use crate::sensors::AnalogInput;
use crate::sensors::rotary::degrees_to_raw;

const NEUTRAL_DEG: f32 = 190.0;
const OUTLET_A_DEG: f32 = 40.0;
const OUTLET_B_DEG: f32 = 295.0;
const ARM_JITTER_DEG: f32 = 4.0;

const AMBIENT_LEVEL: f32 = 620.0;
const AMBIENT_NOISE: f32 = 3.0;
const SHADOW_DROP: f32 = 250.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ArmPhase {
    Neutral,
    Toward(Destination),
}

/// Rotary input that cycles neutral → outlet → neutral.
pub struct SimulatedArm {
    rng: StdRng,
    phase: ArmPhase,
    remaining: u32,
}

impl SimulatedArm {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            phase: ArmPhase::Neutral,
            remaining: 0,
        }
    }

    fn next_phase(&mut self) {
        self.phase = match self.phase {
            ArmPhase::Neutral if self.rng.gen_bool(0.5) => ArmPhase::Toward(Destination::A),
            ArmPhase::Neutral => ArmPhase::Toward(Destination::B),
            ArmPhase::Toward(_) => ArmPhase::Neutral,
        };
        self.remaining = match self.phase {
            ArmPhase::Neutral => self.rng.gen_range(2..8),
            ArmPhase::Toward(_) => self.rng.gen_range(6..20),
        };
    }
}

impl Default for SimulatedArm {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalogInput for SimulatedArm {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        if self.remaining == 0 {
            self.next_phase();
        }
        self.remaining -= 1;

        let centre = match self.phase {
            ArmPhase::Neutral => NEUTRAL_DEG,
            ArmPhase::Toward(Destination::A) => OUTLET_A_DEG,
            ArmPhase::Toward(Destination::B) => OUTLET_B_DEG,
        };
        let jitter = self.rng.gen_range(-ARM_JITTER_DEG..ARM_JITTER_DEG);
        Ok(degrees_to_raw(centre + jitter))
    }
}

/// Light-gate input with occasional one-reading shadows.  With the
/// rolling-baseline detector a single-reading dip trips the gate once.
pub struct SimulatedGate {
    rng: StdRng,
    pass_probability: f64,
}

impl SimulatedGate {
    /// `pass_probability` is the chance per reading that an object is in
    /// front of the gate.
    pub fn new(pass_probability: f64) -> Self {
        Self::with_rng(StdRng::from_entropy(), pass_probability)
    }

    pub fn seeded(pass_probability: f64, seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), pass_probability)
    }

    /// NaN counts as "never", anything else is clamped into `0.0..=1.0`.
    fn with_rng(rng: StdRng, pass_probability: f64) -> Self {
        let pass_probability = if pass_probability.is_nan() {
            0.0
        } else {
            pass_probability.clamp(0.0, 1.0)
        };
        Self {
            rng,
            pass_probability,
        }
    }
}

impl AnalogInput for SimulatedGate {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        let mut level = AMBIENT_LEVEL + self.rng.gen_range(-AMBIENT_NOISE..AMBIENT_NOISE);
        if self.rng.gen_bool(self.pass_probability) {
            level -= SHADOW_DROP;
        }
        Ok(level.clamp(0.0, 1023.0) as u16)
    }
}
