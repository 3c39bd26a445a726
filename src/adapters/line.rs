//! Line adapter: every port the controller needs, bundled.
//!
//! Owns the three sample cells plus the sink, display, judge and clock, and
//! implements all of the port traits so the service can take one
//! `&mut LineAdapter` per tick.

use crate::app::events::{Destination, DomainEvent, StatusKind};
use crate::app::ports::{Display, EventSink, QualityJudge, SensorPort, SignalSource, TimePort};
use crate::error::{DisplayError, SinkError};
use crate::fsm::context::SampleSnapshot;
use crate::sensors::{Channel, SampleCell};

/// The monitor-side handles for one line's channels.
#[derive(Debug, Clone)]
pub struct LineCells {
    pub rotary: SampleCell,
    /// Indexed by [`Destination::index`].
    pub gates: [SampleCell; 2],
}

impl LineCells {
    pub fn new() -> Self {
        Self {
            rotary: SampleCell::new(Channel::Rotary),
            gates: Destination::ALL.map(|d| SampleCell::new(Channel::Gate(d))),
        }
    }

    pub fn gate(&self, destination: Destination) -> &SampleCell {
        &self.gates[destination.index()]
    }
}

impl Default for LineCells {
    fn default() -> Self {
        Self::new()
    }
}

pub struct LineAdapter<S, D, J, T> {
    cells: LineCells,
    sink: S,
    display: D,
    judge: J,
    clock: T,
}

impl<S, D, J, T> LineAdapter<S, D, J, T> {
    pub fn new(cells: LineCells, sink: S, display: D, judge: J, clock: T) -> Self {
        Self {
            cells,
            sink,
            display,
            judge,
            clock,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

// ── SensorPort ────────────────────────────────────────────────

impl<S, D, J, T> SensorPort for LineAdapter<S, D, J, T> {
    fn read_all(&mut self) -> SampleSnapshot {
        SampleSnapshot {
            rotary: self.cells.rotary.value(),
            gates: [
                self.cells.gate(Destination::A).value(),
                self.cells.gate(Destination::B).value(),
            ],
        }
    }
}

// ── Delegating ports ──────────────────────────────────────────

impl<S: EventSink, D, J, T> EventSink for LineAdapter<S, D, J, T> {
    fn report_event(&mut self, event: &DomainEvent, label: &str) -> Result<(), SinkError> {
        self.sink.report_event(event, label)
    }

    fn report_status(&mut self, kind: StatusKind, message: &str) -> Result<(), SinkError> {
        self.sink.report_status(kind, message)
    }
}

impl<S, D: Display, J, T> Display for LineAdapter<S, D, J, T> {
    fn show_message(&mut self, text: &str) -> Result<(), DisplayError> {
        self.display.show_message(text)
    }

    fn show_error(&mut self, text: &str) -> Result<(), DisplayError> {
        self.display.show_error(text)
    }
}

impl<S, D, J: QualityJudge, T> QualityJudge for LineAdapter<S, D, J, T> {
    fn judge(&mut self) -> bool {
        self.judge.judge()
    }
}

impl<S, D, J, T: TimePort> TimePort for LineAdapter<S, D, J, T> {
    fn uptime_ms(&self) -> u64 {
        self.clock.uptime_ms()
    }
}
