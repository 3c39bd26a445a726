//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AcquisitionService (domain)
//! ```
//!
//! Driven adapters (sample cells, event sinks, displays, judges, config
//! storage) implement these traits.  The
//! [`AcquisitionService`](super::service::AcquisitionService) consumes them
//! via generics, so the domain core never touches a bus or a socket.

use crate::config::SystemConfig;
use crate::error::{DisplayError, SinkError};
use crate::fsm::context::SampleSnapshot;
use crate::sensors::Sample;

use super::events::{DomainEvent, StatusKind};

// ───────────────────────────────────────────────────────────────
// Signal source (driven adapter: sensor driver → domain)
// ───────────────────────────────────────────────────────────────

/// Last known value of one channel plus its validity.
///
/// Implementations must never block; the monitor that refreshes the value
/// runs on its own cadence.
pub trait SignalSource {
    fn is_valid(&self) -> bool;

    /// Latest sample.  Carries `valid == false` when [`is_valid`](Self::is_valid) is false.
    fn value(&self) -> Sample;
}

/// Read-side port: the domain calls this once per tick.
pub trait SensorPort {
    /// Latest sample from every channel.
    fn read_all(&mut self) -> SampleSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → time-series store)
// ───────────────────────────────────────────────────────────────

/// Receives detected objects and run-state reports.
///
/// Fire-and-forget from the domain's point of view: the service logs a
/// failed write and carries on.  Buffering and retry belong to the adapter.
pub trait EventSink {
    /// An object passed the gate for `event.destination`; `label` is the
    /// configured name of that outlet.
    fn report_event(&mut self, event: &DomainEvent, label: &str) -> Result<(), SinkError>;

    fn report_status(&mut self, kind: StatusKind, message: &str) -> Result<(), SinkError>;
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → operator panel)
// ───────────────────────────────────────────────────────────────

/// Operator-facing text panel with a colour indicator.
pub trait Display {
    /// Show `text` with the neutral indicator.
    fn show_message(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Show `text` with the alert indicator.
    fn show_error(&mut self, text: &str) -> Result<(), DisplayError>;
}

// ───────────────────────────────────────────────────────────────
// Quality judge, clock
// ───────────────────────────────────────────────────────────────

/// Pass/fail policy applied to every light-gate event.
pub trait QualityJudge {
    fn judge(&mut self) -> bool;
}

/// Monotonic milliseconds since the process started.
pub trait TimePort {
    fn uptime_ms(&self) -> u64;
}

/// Everything one controller tick needs, bundled so the service can take a
/// single `&mut` and avoid juggling several borrows of the same adapter.
pub trait LinePorts: SensorPort + EventSink + Display + QualityJudge + TimePort {}

impl<T> LinePorts for T where T: SensorPort + EventSink + Display + QualityJudge + TimePort {}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ config file)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations must validate before persisting.  Invalid values are
/// rejected with [`ConfigError::ValidationFailed`], never clamped.
pub trait ConfigPort {
    /// Load configuration.  Returns [`SystemConfig::default()`] if none is stored.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config could not be parsed.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Underlying storage could not be read or written.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
