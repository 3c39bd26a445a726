//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to.  It holds the latest samples, the detectors and liveness
//! timer, configuration, and the outputs the handlers request (queued
//! sink writes and the pending display update).  Think of it as the
//! "blackboard" in a blackboard architecture.

use log::warn;

use crate::app::events::{Destination, Indicator, StatusKind, StatusReport, truncated};
use crate::config::SystemConfig;
use crate::detect::{EdgeDetector, LivenessTimer, ThresholdDetector};
use crate::sensors::{Channel, Sample};

// ---------------------------------------------------------------------------
// Sample snapshot (read-only to state handlers; written by the service)
// ---------------------------------------------------------------------------

/// The latest sample of every channel, taken at the start of a tick.
#[derive(Debug, Clone, Copy)]
pub struct SampleSnapshot {
    pub rotary: Sample,
    /// Indexed by [`Destination::index`].
    pub gates: [Sample; 2],
}

impl SampleSnapshot {
    pub fn gate(&self, destination: Destination) -> &Sample {
        &self.gates[destination.index()]
    }

    /// Invalidate every reading taken more than `max_age_ms` before
    /// `now_ms`.  A monitor stuck in a bus read stops counting as a source.
    pub fn expire(&mut self, now_ms: u64, max_age_ms: u64) {
        for sample in core::iter::once(&mut self.rotary).chain(&mut self.gates) {
            if sample.valid && now_ms.saturating_sub(sample.taken_at_ms) > max_age_ms {
                sample.valid = false;
            }
        }
    }
}

impl Default for SampleSnapshot {
    fn default() -> Self {
        Self {
            rotary: Sample::invalid(Channel::Rotary),
            gates: Destination::ALL.map(|d| Sample::invalid(Channel::Gate(d))),
        }
    }
}

// ---------------------------------------------------------------------------
// Outputs (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Display text capacity (two 16-character LCD rows).
pub const DISPLAY_CAP: usize = 32;

/// Outbox capacity.  A single tick queues at most one status plus one
/// event per gate.
pub const OUTBOX_CAP: usize = 8;

/// A sink write requested by a handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// An object passed the gate for this outlet; judged and timestamped on flush.
    Passed(Destination),
    Status(StatusReport),
}

/// Desired display content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCommand {
    pub text: heapless::String<DISPLAY_CAP>,
    pub indicator: Indicator,
}

impl Default for DisplayCommand {
    fn default() -> Self {
        Self {
            text: heapless::String::new(),
            indicator: Indicator::Neutral,
        }
    }
}

/// Why the controller is in `Faulted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultReason {
    /// No directional edge within the liveness wait.
    LivenessTimeout,
    /// A collaborator failed to come up; the text is shown on the display.
    Init(heapless::String<DISPLAY_CAP>),
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Timing --
    /// Monotonic total tick count.
    pub total_ticks: u64,
    /// Uptime at the start of the current tick (milliseconds).
    pub now_ms: u64,

    // -- Inputs --
    pub samples: SampleSnapshot,

    // -- Detectors --
    pub edge: EdgeDetector,
    /// Indexed by [`Destination::index`].
    pub gates: [ThresholdDetector; 2],
    pub liveness: LivenessTimer,

    // -- Configuration --
    pub config: SystemConfig,

    // -- Outputs --
    pub outbox: heapless::Vec<Outbound, OUTBOX_CAP>,
    pub display: DisplayCommand,
    /// Set whenever `display` changed since the service last applied it.
    pub display_dirty: bool,

    // -- Status --
    pub fault: Option<FaultReason>,
    /// `true` until the initial state's `enter` has run.
    pub booting: bool,
    /// Directional edges accepted since startup.
    pub edges_accepted: u64,
}

impl FsmContext {
    pub fn new(config: SystemConfig, now_ms: u64) -> Self {
        Self {
            total_ticks: 0,
            now_ms,
            samples: SampleSnapshot::default(),
            edge: EdgeDetector::new(config.rotary_low_deg, config.rotary_high_deg),
            gates: [
                ThresholdDetector::new(config.light_delta),
                ThresholdDetector::new(config.light_delta),
            ],
            liveness: LivenessTimer::new(now_ms),
            config,
            outbox: heapless::Vec::new(),
            display: DisplayCommand::default(),
            display_dirty: false,
            fault: None,
            booting: true,
            edges_accepted: 0,
        }
    }

    /// Request a display update.
    pub fn show(&mut self, text: &str, indicator: Indicator) {
        self.display = DisplayCommand {
            text: truncated(text),
            indicator,
        };
        self.display_dirty = true;
    }

    /// Queue a status report for the sink.
    pub fn report(&mut self, kind: StatusKind, message: &str) {
        self.push(Outbound::Status(StatusReport::new(kind, message)));
    }

    /// Queue an object-passed event for the sink.
    pub fn passed(&mut self, destination: Destination) {
        self.push(Outbound::Passed(destination));
    }

    /// Push new thresholds into the detectors.  Latches and baselines survive.
    pub fn apply_config(&mut self, config: SystemConfig) {
        self.edge
            .set_thresholds(config.rotary_low_deg, config.rotary_high_deg);
        for gate in &mut self.gates {
            gate.set_delta(config.light_delta);
        }
        self.config = config;
    }

    fn push(&mut self, out: Outbound) {
        if let Err(dropped) = self.outbox.push(out) {
            warn!("Outbox full, dropping {:?}", dropped);
        }
    }
}
