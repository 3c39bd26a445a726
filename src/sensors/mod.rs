//! Sensor subsystem: per-channel sample cells and background monitors.
//!
//! Each physical channel gets a [`SampleCell`] holding its last known value
//! plus a validity flag.  A [`SensorMonitor`] thread refreshes the cell at
//! its own cadence; the controller only ever reads the cell, never the bus.
//!
//! ```text
//!  AnalogInput ──▶ Sensor (rotary/light) ──▶ SensorMonitor ──▶ SampleCell
//!                                             (own thread)       │
//!                                                                ▼
//!                                              controller tick reads value()
//! ```

pub mod light;
pub mod rotary;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info};

use crate::app::events::Destination;
use crate::app::ports::{SignalSource, TimePort};
use crate::error::SensorError;

// ---------------------------------------------------------------------------
// Samples
// ---------------------------------------------------------------------------

/// Physical channel a sample was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Dispensing-arm rotary angle sensor.
    Rotary,
    /// Light gate in front of an outlet.
    Gate(Destination),
}

/// A single reading from one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub channel: Channel,
    /// Degrees for [`Channel::Rotary`], raw intensity for gates.
    pub value: f32,
    /// `false` until the monitor has produced a good reading.
    pub valid: bool,
    /// Monotonic time the reading was taken (milliseconds).
    pub taken_at_ms: u64,
}

impl Sample {
    /// A valid reading.
    pub fn new(channel: Channel, value: f32, taken_at_ms: u64) -> Self {
        Self {
            channel,
            value,
            valid: true,
            taken_at_ms,
        }
    }

    /// Placeholder for a channel that has no usable reading.
    pub fn invalid(channel: Channel) -> Self {
        Self {
            channel,
            value: 0.0,
            valid: false,
            taken_at_ms: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Sample cell
// ---------------------------------------------------------------------------

/// Last-known value of one channel, shared between its monitor thread and
/// the controller.  Cloning yields another handle to the same cell.
#[derive(Debug, Clone)]
pub struct SampleCell {
    channel: Channel,
    latest: Arc<Mutex<Option<(f32, u64)>>>,
}

impl SampleCell {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            latest: Arc::new(Mutex::new(None)),
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Store a fresh reading.
    pub fn store(&self, value: f32, taken_at_ms: u64) {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some((value, taken_at_ms));
    }

    /// Mark the channel as having no usable reading.
    pub fn invalidate(&self) {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl SignalSource for SampleCell {
    fn is_valid(&self) -> bool {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn value(&self) -> Sample {
        match *self.latest.lock().unwrap_or_else(PoisonError::into_inner) {
            Some((value, at)) => Sample::new(self.channel, value, at),
            None => Sample::invalid(self.channel),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor traits
// ---------------------------------------------------------------------------

/// A raw 10-bit analog input (GrovePi port, simulator, ...).
pub trait AnalogInput {
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}

/// A sensor that converts raw input into the value the detectors consume.
pub trait Sensor {
    fn read(&mut self) -> Result<f32, SensorError>;
}

// ---------------------------------------------------------------------------
// Background monitor
// ---------------------------------------------------------------------------

/// Handle to a running monitor thread.
pub struct SensorMonitor {
    channel: Channel,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SensorMonitor {
    /// Spawn a thread that reads `sensor` every `interval` and stores the
    /// result in `cell`.  A failed read invalidates the cell until the next
    /// good one.
    pub fn spawn<S, T>(
        mut sensor: S,
        cell: SampleCell,
        clock: T,
        interval: Duration,
    ) -> std::io::Result<Self>
    where
        S: Sensor + Send + 'static,
        T: TimePort + Send + 'static,
    {
        let channel = cell.channel();
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name(format!("monitor-{channel:?}"))
            .spawn(move || {
                while flag.load(Ordering::Acquire) {
                    match sensor.read() {
                        Ok(value) => cell.store(value, clock.uptime_ms()),
                        Err(e) => {
                            debug!("{:?}: read failed ({}), sample invalid", cell.channel(), e);
                            cell.invalidate();
                        }
                    }
                    thread::sleep(interval);
                }
            })?;

        info!("Monitor started for {:?} every {:?}", channel, interval);
        Ok(Self {
            channel,
            running,
            handle: Some(handle),
        })
    }

    /// Stop the thread and wait for it to exit.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Monitor for {:?} panicked", self.channel);
            }
        }
    }
}

impl Drop for SensorMonitor {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}
