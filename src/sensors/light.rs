//! Grove light sensor used as a light gate in front of an outlet.
//!
//! The photoresistor divider is read as a raw 10-bit intensity.  The gate
//! detector works on per-tick differences, so no unit conversion is applied.

use super::{AnalogInput, Sensor};
use crate::error::SensorError;

const ADC_MAX: u16 = 1023;

pub struct LightSensor<A> {
    input: A,
}

impl<A: AnalogInput> LightSensor<A> {
    pub fn new(input: A) -> Self {
        Self { input }
    }
}

impl<A: AnalogInput> Sensor for LightSensor<A> {
    fn read(&mut self) -> Result<f32, SensorError> {
        let raw = self.input.read_raw()?;
        if raw > ADC_MAX {
            return Err(SensorError::OutOfRange);
        }
        Ok(f32::from(raw))
    }
}
