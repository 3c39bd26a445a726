//! Outbound domain events and status reports.
//!
//! The [`AcquisitionService`](super::service::AcquisitionService) forwards
//! these through the [`EventSink`](super::ports::EventSink) port.  Adapters
//! on the other side decide what to do with them (write line protocol,
//! log to the console, and so on).

use core::fmt;

/// Outlet the dispensing arm can point at.  Also tags light-gate events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    A,
    B,
}

impl Destination {
    /// Both outlets, in gate-index order.
    pub const ALL: [Self; 2] = [Self::A, Self::B];

    /// Index into per-gate arrays.
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// An object passed the light gate in front of `destination`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainEvent {
    pub destination: Destination,
    /// Pass/fail from the quality judge; `None` when no judgment was made.
    pub good: Option<bool>,
    /// Controller uptime when the event was detected (milliseconds).
    pub at_ms: u64,
}

/// Sink-facing status category, one per run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Active,
    Inactive,
    Error,
}

impl StatusKind {
    /// Tag value written to the sink.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capacity of a status message.
pub const STATUS_MSG_CAP: usize = 64;

/// A status change to be written to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub kind: StatusKind,
    pub message: heapless::String<STATUS_MSG_CAP>,
}

impl StatusReport {
    /// Build a report, truncating `message` to [`STATUS_MSG_CAP`] bytes.
    pub fn new(kind: StatusKind, message: &str) -> Self {
        Self {
            kind,
            message: truncated(message),
        }
    }
}

/// Display colour class that accompanies every text update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Backlight off, normal operation.
    Neutral,
    /// Red backlight, fault.
    Alert,
}

impl Indicator {
    /// Backlight colour (R, G, B), each 0 to 255.
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Neutral => (0, 0, 0),
            Self::Alert => (255, 0, 0),
        }
    }
}

/// Copy as much of `text` as fits into a fixed-capacity string, never
/// splitting a UTF-8 sequence.
pub fn truncated<const N: usize>(text: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
