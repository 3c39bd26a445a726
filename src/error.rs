//! Unified error types for the line monitor.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! tick loop's error handling uniform.  All variants are `Copy` so they can
//! be cheaply passed through the controller without allocation.

use core::fmt;

pub use crate::app::ports::ConfigError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned out-of-range data.
    Sensor(SensorError),
    /// The time-series sink rejected or lost a write.
    Sink(SinkError),
    /// The operator display could not be updated.
    Display(DisplayError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Sink(e) => write!(f, "sink: {e}"),
            Self::Display(e) => write!(f, "display: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// I2C write of the read command failed.
    BusWriteFailed,
    /// I2C read of the reply failed.
    BusReadFailed,
    /// Reading is outside the physically plausible range.
    OutOfRange,
    /// The co-processor answered for a different command.
    UnexpectedReply,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusWriteFailed => write!(f, "bus write failed"),
            Self::BusReadFailed => write!(f, "bus read failed"),
            Self::OutOfRange => write!(f, "reading out of range"),
            Self::UnexpectedReply => write!(f, "unexpected reply"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

impl embedded_hal::digital::Error for SensorError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

// ---------------------------------------------------------------------------
// Sink errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkError {
    /// The underlying writer failed.
    Io(std::io::ErrorKind),
    /// The sink has not been connected yet.
    NotConnected,
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(kind) => write!(f, "write failed ({kind})"),
            Self::NotConnected => write!(f, "not connected"),
        }
    }
}

impl From<std::io::Error> for SinkError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.kind())
    }
}

impl From<SinkError> for Error {
    fn from(e: SinkError) -> Self {
        Self::Sink(e)
    }
}

// ---------------------------------------------------------------------------
// Display errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// Text controller did not acknowledge.
    TextBus,
    /// Backlight controller did not acknowledge.
    BacklightBus,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TextBus => write!(f, "LCD text write failed"),
            Self::BacklightBus => write!(f, "LCD backlight write failed"),
        }
    }
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Self::Display(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
