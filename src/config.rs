//! System configuration parameters
//!
//! All tunable parameters for the line monitor.
//! Values can be overridden from a JSON file (see
//! [`JsonConfigFile`](crate::adapters::config_file::JsonConfigFile)) or
//! hot-swapped at runtime through `AppCommand::UpdateConfig`.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::events::{Destination, truncated};
use crate::app::ports::ConfigError;

/// Maximum length of an outlet label (it becomes a line-protocol tag value).
pub const LABEL_CAP: usize = 16;

/// Outlet label as stored in the config.
pub type Label = heapless::String<LABEL_CAP>;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Timing ---
    /// Controller tick interval (milliseconds)
    pub tick_interval_ms: u32,
    /// Background sensor refresh interval (milliseconds)
    pub sensor_read_interval_ms: u32,
    /// Readings older than this are treated as missing (milliseconds)
    pub sample_max_age_ms: u32,
    /// Maximum time without an arm rotation before faulting (milliseconds)
    pub liveness_wait_ms: u32,
    /// Telemetry log interval (seconds)
    pub telemetry_interval_secs: u32,

    // --- Rotary arm ---
    /// Below this angle (degrees) the arm points at outlet A
    pub rotary_low_deg: f32,
    /// Above this angle (degrees) the arm points at outlet B
    pub rotary_high_deg: f32,

    // --- Light gates ---
    /// Per-tick intensity change that counts as an object passing
    pub light_delta: f32,

    // --- Quality ---
    /// Probability that the random judge reports "good" (0.0–1.0)
    pub good_probability: f64,

    // --- Sink ---
    /// Tag value written for outlet A
    pub destination_a_label: Label,
    /// Tag value written for outlet B
    pub destination_b_label: Label,
    /// UDP `host:port` of the line-protocol listener; stdout when unset
    pub sink_addr: Option<String>,

    // --- Hardware ---
    /// I2C bus device carrying the GrovePi and the LCD (e.g. `/dev/i2c-1`);
    /// simulated inputs when unset
    pub i2c_bus: Option<String>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Timing
            tick_interval_ms: 500,
            sensor_read_interval_ms: 500,
            sample_max_age_ms: 1_500,
            liveness_wait_ms: 15_000,
            telemetry_interval_secs: 60,

            // Rotary arm
            rotary_low_deg: 100.0,
            rotary_high_deg: 280.0,

            // Light gates
            light_delta: 20.0,

            // Quality
            good_probability: 0.9,

            // Sink
            destination_a_label: label("Svizzera"),
            destination_b_label: label("Italia"),
            sink_addr: None,

            // Hardware
            i2c_bus: None,
        }
    }
}

impl SystemConfig {
    /// Controller tick period.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.tick_interval_ms))
    }

    /// Background sensor refresh period.
    pub fn sensor_read_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.sensor_read_interval_ms))
    }

    /// Liveness wait interval.
    pub fn liveness_wait(&self) -> Duration {
        Duration::from_millis(u64::from(self.liveness_wait_ms))
    }

    /// Operator-facing label for a destination.
    pub fn label_for(&self, destination: Destination) -> &str {
        match destination {
            Destination::A => &self.destination_a_label,
            Destination::B => &self.destination_b_label,
        }
    }

    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_interval_ms must be > 0"));
        }
        if self.sensor_read_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "sensor_read_interval_ms must be > 0",
            ));
        }
        if self.sample_max_age_ms < self.sensor_read_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "sample_max_age_ms must be at least sensor_read_interval_ms",
            ));
        }
        if self.liveness_wait_ms <= self.tick_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "liveness_wait_ms must exceed tick_interval_ms",
            ));
        }
        if !(0.0..=360.0).contains(&self.rotary_low_deg)
            || !(0.0..=360.0).contains(&self.rotary_high_deg)
        {
            return Err(ConfigError::ValidationFailed(
                "rotary thresholds must lie within 0..=360 degrees",
            ));
        }
        if self.rotary_low_deg >= self.rotary_high_deg {
            return Err(ConfigError::ValidationFailed(
                "rotary_low_deg must be below rotary_high_deg",
            ));
        }
        if !(self.light_delta.is_finite() && self.light_delta > 0.0) {
            return Err(ConfigError::ValidationFailed("light_delta must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.good_probability) {
            return Err(ConfigError::ValidationFailed(
                "good_probability must lie within 0.0..=1.0",
            ));
        }
        if self.destination_a_label.is_empty() || self.destination_b_label.is_empty() {
            return Err(ConfigError::ValidationFailed("destination labels must not be empty"));
        }
        Ok(())
    }
}

/// Build a label, truncating to [`LABEL_CAP`] bytes on a char boundary.
pub fn label(text: &str) -> Label {
    truncated(text)
}
