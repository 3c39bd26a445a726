//! Application service: the hexagonal core.
//!
//! [`AcquisitionService`] owns the FSM and its shared context.  It exposes a
//! hardware-agnostic API; all I/O flows through port traits injected at call
//! sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!                 │   AcquisitionService    │
//! QualityJudge ──▶│  FSM · detectors · timer│ ──▶ Display
//!                 └─────────────────────────┘
//! ```
//!
//! State handlers never call a port.  They queue sink writes and a display
//! update on the context; [`tick`](AcquisitionService::tick) applies them
//! after the FSM has settled.

use core::fmt;

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::error::Error;
use crate::fsm::context::{FaultReason, FsmContext, Outbound};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, RunState};

use super::commands::AppCommand;
use super::events::{Destination, DomainEvent, Indicator, StatusReport, truncated};
use super::ports::{Display, EventSink, LinePorts};

// ───────────────────────────────────────────────────────────────
// Telemetry
// ───────────────────────────────────────────────────────────────

/// Counters since startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Telemetry {
    pub state: RunState,
    pub ticks: u64,
    pub edges_accepted: u64,
    /// Gate events per destination, indexed by [`Destination::index`].
    pub events: [u64; 2],
    pub good: u64,
    pub bad: u64,
    /// Sink writes that failed and were dropped.
    pub sink_failures: u64,
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "state={:?} ticks={} edges={} A={} B={} good={} bad={} sink_failures={}",
            self.state,
            self.ticks,
            self.edges_accepted,
            self.events[Destination::A.index()],
            self.events[Destination::B.index()],
            self.good,
            self.bad,
            self.sink_failures,
        )
    }
}

#[derive(Debug, Default)]
struct Counters {
    events: [u64; 2],
    good: u64,
    bad: u64,
    sink_failures: u64,
}

// ───────────────────────────────────────────────────────────────
// AcquisitionService
// ───────────────────────────────────────────────────────────────

/// Orchestrates detection, state and reporting for one dispensing line.
pub struct AcquisitionService {
    fsm: Fsm,
    ctx: FsmContext,
    counters: Counters,
}

impl AcquisitionService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) or
    /// [`fail_start`](Self::fail_start) next.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            fsm: Fsm::new(build_state_table(), RunState::Running),
            ctx: FsmContext::new(config, 0),
            counters: Counters::default(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter `Running` and announce the start on the sink and display.
    pub fn start(&mut self, io: &mut impl LinePorts) -> Result<(), Error> {
        self.ctx.now_ms = io.uptime_ms();
        self.fsm.start(&mut self.ctx);
        info!("AcquisitionService started in {:?}", self.fsm.current_state());
        self.flush(io)
    }

    /// Start directly in `Faulted` because a collaborator failed to come up.
    ///
    /// `reason` is reported as an error status and shown with the alert
    /// indicator.  The caller still owns the original error and is expected
    /// to abort.  `sink` may be a fall-back when the real sink is what failed.
    pub fn fail_start(
        &mut self,
        reason: &str,
        sink: &mut impl EventSink,
        display: &mut impl Display,
    ) -> Result<(), Error> {
        self.ctx.fault = Some(FaultReason::Init(truncated(reason)));
        self.ctx.booting = false;
        self.fsm.force_transition(RunState::Faulted, &mut self.ctx);

        for out in core::mem::take(&mut self.ctx.outbox) {
            match out {
                Outbound::Status(report) => self.send_status(&report, sink),
                Outbound::Passed(d) => debug!("Dropping event for {} during failed start", d),
            }
        }
        self.apply_display(display)
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: snapshot samples → FSM → sink and display.
    ///
    /// Sink failures are logged and counted.  A display failure is returned,
    /// and the pending screen is written again on the next tick.
    pub fn tick(&mut self, io: &mut impl LinePorts) -> Result<(), Error> {
        self.ctx.now_ms = io.uptime_ms();
        self.ctx.samples = io.read_all();
        self.ctx
            .samples
            .expire(self.ctx.now_ms, u64::from(self.ctx.config.sample_max_age_ms));
        self.fsm.tick(&mut self.ctx);
        self.flush(io)
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command.
    pub fn handle_command(&mut self, cmd: AppCommand, io: &mut impl LinePorts) -> Result<(), Error> {
        match cmd {
            AppCommand::ManualOverride => {
                self.ctx.now_ms = io.uptime_ms();
                let target = match self.fsm.current_state() {
                    RunState::Running => RunState::Paused,
                    RunState::Paused | RunState::Faulted => RunState::Running,
                };
                info!("Manual override: {:?} -> {:?}", self.fsm.current_state(), target);
                self.fsm.force_transition(target, &mut self.ctx);
                self.flush(io)
            }
            AppCommand::UpdateConfig(new_config) => {
                new_config.validate()?;
                self.ctx.apply_config(new_config);
                info!("Configuration updated at runtime");
                Ok(())
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> RunState {
        self.fsm.current_state()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.ctx.total_ticks
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            state: self.fsm.current_state(),
            ticks: self.ctx.total_ticks,
            edges_accepted: self.ctx.edges_accepted,
            events: self.counters.events,
            good: self.counters.good,
            bad: self.counters.bad,
            sink_failures: self.counters.sink_failures,
        }
    }

    /// Clone of the live configuration.
    pub fn current_config(&self) -> SystemConfig {
        self.ctx.config.clone()
    }

    /// Whether the rotary detector will emit on the next band entry.
    pub fn edge_armed(&self) -> bool {
        self.ctx.edge.is_armed()
    }

    // ── Internal ──────────────────────────────────────────────

    /// Drain the outbox into the sink, then push any display change.
    fn flush(&mut self, io: &mut impl LinePorts) -> Result<(), Error> {
        for out in core::mem::take(&mut self.ctx.outbox) {
            match out {
                Outbound::Passed(destination) => {
                    let good = io.judge();
                    let event = DomainEvent {
                        destination,
                        good: Some(good),
                        at_ms: self.ctx.now_ms,
                    };
                    self.send_event(&event, io);
                }
                Outbound::Status(report) => self.send_status(&report, io),
            }
        }
        self.apply_display(io)
    }

    fn send_event(&mut self, event: &DomainEvent, sink: &mut impl EventSink) {
        self.counters.events[event.destination.index()] += 1;
        match event.good {
            Some(true) => self.counters.good += 1,
            Some(false) => self.counters.bad += 1,
            None => {}
        }

        let label = self.ctx.config.label_for(event.destination);
        info!("Object passed toward {} (good={:?})", label, event.good);
        if let Err(e) = sink.report_event(event, label) {
            self.counters.sink_failures += 1;
            warn!("Event for {} lost: {}", label, e);
        }
    }

    fn send_status(&mut self, report: &StatusReport, sink: &mut impl EventSink) {
        if let Err(e) = sink.report_status(report.kind, &report.message) {
            self.counters.sink_failures += 1;
            warn!("Status {} lost: {}", report.kind, e);
        }
    }

    fn apply_display(&mut self, display: &mut impl Display) -> Result<(), Error> {
        if !self.ctx.display_dirty {
            return Ok(());
        }

        // Stays dirty on failure so the next flush writes it again.
        let text = &self.ctx.display.text;
        match self.ctx.display.indicator {
            Indicator::Neutral => display.show_message(text)?,
            Indicator::Alert => display.show_error(text)?,
        }
        self.ctx.display_dirty = false;
        Ok(())
    }
}
