//! Quality judge policies.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::app::ports::QualityJudge;

/// Passes each object with a fixed probability.  Stands in for a real
/// downstream quality sensor.
pub struct RandomJudge {
    rng: StdRng,
    good_probability: f64,
}

impl RandomJudge {
    pub fn new(good_probability: f64) -> Self {
        Self::with_rng(StdRng::from_entropy(), good_probability)
    }

    /// Reproducible sequence, for tests and replays.
    pub fn seeded(good_probability: f64, seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), good_probability)
    }

    fn with_rng(rng: StdRng, good_probability: f64) -> Self {
        let good_probability = if good_probability.is_nan() {
            0.0
        } else {
            good_probability.clamp(0.0, 1.0)
        };
        Self {
            rng,
            good_probability,
        }
    }
}

impl QualityJudge for RandomJudge {
    fn judge(&mut self) -> bool {
        self.rng.gen_bool(self.good_probability)
    }
}

/// Always returns the same verdict.
#[derive(Debug, Clone, Copy)]
pub struct FixedJudge(pub bool);

impl QualityJudge for FixedJudge {
    fn judge(&mut self) -> bool {
        self.0
    }
}
