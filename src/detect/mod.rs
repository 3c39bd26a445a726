//! Signal-to-event detectors.
//!
//! Each detector consumes one [`Sample`](crate::sensors::Sample) per tick
//! and emits at most one event per excursion.  Invalid samples are skipped
//! without touching detector state.  None of them can fail.

pub mod edge;
pub mod liveness;
pub mod threshold;

pub use edge::EdgeDetector;
pub use liveness::LivenessTimer;
pub use threshold::ThresholdDetector;
