//! Mock line adapter for integration tests.
//!
//! Scripted samples and a hand-driven clock on the input side; every sink
//! write and display update recorded on the output side, so tests can
//! assert on the full history without a GrovePi or a database.

use std::collections::VecDeque;

use linewatch::app::events::{Destination, DomainEvent, Indicator, StatusKind};
use linewatch::app::ports::{Display, EventSink, QualityJudge, SensorPort, TimePort};
use linewatch::error::{DisplayError, SinkError};
use linewatch::fsm::context::SampleSnapshot;
use linewatch::sensors::{Channel, Sample};

// ── MockLine ──────────────────────────────────────────────────

pub struct MockLine {
    // Inputs
    pub now_ms: u64,
    pub samples: SampleSnapshot,
    pub verdicts: VecDeque<bool>,

    // Recorded outputs
    pub events: Vec<(DomainEvent, String)>,
    pub statuses: Vec<(StatusKind, String)>,
    pub screens: Vec<(String, Indicator)>,

    // Failure injection
    pub sink_down: bool,
    pub display_down: bool,
}

#[allow(dead_code)]
impl MockLine {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            samples: SampleSnapshot::default(),
            verdicts: VecDeque::new(),
            events: Vec::new(),
            statuses: Vec::new(),
            screens: Vec::new(),
            sink_down: false,
            display_down: false,
        }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }

    pub fn set_rotary(&mut self, degrees: f32) {
        self.samples.rotary = Sample::new(Channel::Rotary, degrees, self.now_ms);
    }

    pub fn set_gate(&mut self, destination: Destination, value: f32) {
        self.samples.gates[destination.index()] =
            Sample::new(Channel::Gate(destination), value, self.now_ms);
    }

    pub fn destinations(&self) -> Vec<Destination> {
        self.events.iter().map(|(e, _)| e.destination).collect()
    }

    pub fn last_status(&self) -> Option<(StatusKind, &str)> {
        self.statuses.last().map(|(k, m)| (*k, m.as_str()))
    }

    pub fn screen(&self) -> Option<(&str, Indicator)> {
        self.screens.last().map(|(t, i)| (t.as_str(), *i))
    }

    pub fn count_status(&self, kind: StatusKind) -> usize {
        self.statuses.iter().filter(|(k, _)| *k == kind).count()
    }
}

impl Default for MockLine {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockLine {
    fn read_all(&mut self) -> SampleSnapshot {
        self.samples
    }
}

impl EventSink for MockLine {
    fn report_event(&mut self, event: &DomainEvent, label: &str) -> Result<(), SinkError> {
        if self.sink_down {
            return Err(SinkError::NotConnected);
        }
        self.events.push((*event, label.to_owned()));
        Ok(())
    }

    fn report_status(&mut self, kind: StatusKind, message: &str) -> Result<(), SinkError> {
        if self.sink_down {
            return Err(SinkError::NotConnected);
        }
        self.statuses.push((kind, message.to_owned()));
        Ok(())
    }
}

impl Display for MockLine {
    fn show_message(&mut self, text: &str) -> Result<(), DisplayError> {
        if self.display_down {
            return Err(DisplayError::TextBus);
        }
        self.screens.push((text.to_owned(), Indicator::Neutral));
        Ok(())
    }

    fn show_error(&mut self, text: &str) -> Result<(), DisplayError> {
        if self.display_down {
            return Err(DisplayError::TextBus);
        }
        self.screens.push((text.to_owned(), Indicator::Alert));
        Ok(())
    }
}

impl QualityJudge for MockLine {
    /// Scripted verdicts first, then "good".
    fn judge(&mut self) -> bool {
        self.verdicts.pop_front().unwrap_or(true)
    }
}

impl TimePort for MockLine {
    fn uptime_ms(&self) -> u64 {
        self.now_ms
    }
}
