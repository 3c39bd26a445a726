//! Grove rotary angle sensor on the dispensing arm.
//!
//! A 10 kΩ linear potentiometer with a 300° mechanical travel, read as a
//! 10-bit value through the GrovePi ADC.  The conversion mirrors the
//! Grove reference: raw → volts at the ADC reference → fraction of the
//! module supply → fraction of full travel.

use super::{AnalogInput, Sensor};
use crate::error::SensorError;

/// Mechanical travel of the potentiometer (degrees).
pub const FULL_ANGLE_DEG: f32 = 300.0;
/// ADC reference voltage on the GrovePi.
const ADC_REF_V: f32 = 5.0;
/// Supply voltage of the Grove module.
const GROVE_VCC_V: f32 = 5.0;
/// Full-scale 10-bit reading.
const ADC_MAX: f32 = 1023.0;

/// Rotary angle sensor driver.
pub struct RotarySensor<A> {
    input: A,
}

impl<A: AnalogInput> RotarySensor<A> {
    pub fn new(input: A) -> Self {
        Self { input }
    }
}

/// Convert a raw 10-bit reading to degrees.
pub fn raw_to_degrees(raw: u16) -> Result<f32, SensorError> {
    let raw = f32::from(raw);
    if raw > ADC_MAX {
        return Err(SensorError::OutOfRange);
    }
    let volts = raw * ADC_REF_V / ADC_MAX;
    Ok(volts * FULL_ANGLE_DEG / GROVE_VCC_V)
}

/// Raw reading that corresponds to `degrees` (used by the simulator).
pub fn degrees_to_raw(degrees: f32) -> u16 {
    let clamped = degrees.clamp(0.0, FULL_ANGLE_DEG);
    (clamped / FULL_ANGLE_DEG * ADC_MAX).round() as u16
}

impl<A: AnalogInput> Sensor for RotarySensor<A> {
    fn read(&mut self) -> Result<f32, SensorError> {
        let raw = self.input.read_raw()?;
        raw_to_degrees(raw)
    }
}
