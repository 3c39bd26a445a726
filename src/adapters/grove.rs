//! A physical line on a GrovePi hat.
//!
//! Builds every hardware-facing part from two I2C handles: the rotary
//! sensor and both light gates on the hat's analog ports, the override
//! button on its digital port, and the RGB LCD as the display.  Port
//! numbers come from [`crate::pins`].
//!
//! The two handles may point at the same bus device; the hat and the panel
//! answer on different addresses.

use std::sync::Arc;

use embedded_hal::i2c::I2c;

use crate::drivers::button::PressDetector;
use crate::drivers::grovepi::{self, GroveAnalogPin, GroveDigitalPin, GrovePi};
use crate::drivers::rgb_lcd::RgbLcd;
use crate::error::DisplayError;
use crate::pins::{BUTTON_PORT, LIGHT_GATE_A_PORT, LIGHT_GATE_B_PORT, ROTARY_PORT};
use crate::sensors::light::LightSensor;
use crate::sensors::rotary::RotarySensor;

pub struct GroveLine<HAT, LCD> {
    pub rotary: RotarySensor<GroveAnalogPin<HAT>>,
    /// Indexed by [`Destination::index`](crate::app::events::Destination::index).
    pub gates: [LightSensor<GroveAnalogPin<HAT>>; 2],
    pub button: PressDetector<GroveDigitalPin<HAT>>,
    pub lcd: RgbLcd<LCD>,
}

impl<HAT: I2c, LCD: I2c> GroveLine<HAT, LCD> {
    /// Wire the line.  Fails only if the panel does not come up; the hat is
    /// not touched until the first read.
    pub fn new(hat_bus: HAT, lcd_bus: LCD) -> Result<Self, DisplayError> {
        let lcd = RgbLcd::new(lcd_bus)?;
        let hat = grovepi::shared(GrovePi::new(hat_bus));
        let analog = |port| GroveAnalogPin::new(Arc::clone(&hat), port);

        Ok(Self {
            rotary: RotarySensor::new(analog(ROTARY_PORT)),
            gates: [
                LightSensor::new(analog(LIGHT_GATE_A_PORT)),
                LightSensor::new(analog(LIGHT_GATE_B_PORT)),
            ],
            // Grove button modules pull the line high while pressed.
            button: PressDetector::new(GroveDigitalPin::new(Arc::clone(&hat), BUTTON_PORT), false),
            lcd,
        })
    }
}
