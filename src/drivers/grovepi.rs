//! GrovePi+ co-processor driver.
//!
//! The hat's ATmega answers simple four-byte commands on I2C.  Every
//! command frame is prefixed with a register byte of `1`:
//!
//! | Command       | Frame               | Reply                        |
//! |---------------|---------------------|------------------------------|
//! | digital read  | `[1, 1, pin, 0, 0]` | 1 byte, 0 or 1               |
//! | analog read   | `[1, 3, pin, 0, 0]` | 3 bytes, `[_, hi, lo]` 10-bit |
//!
//! The bus is shared by every channel on the hat, so each port handle holds
//! an `Arc<Mutex<GrovePi<_>>>` and a command/reply pair runs under the lock.

use std::sync::{Arc, Mutex, PoisonError};

use embedded_hal::digital::{ErrorType, InputPin};
use embedded_hal::i2c::{Error as _, I2c};
use log::debug;

use crate::error::SensorError;
use crate::pins::GROVEPI_I2C_ADDR;
use crate::sensors::AnalogInput;

const REG_COMMAND: u8 = 1;
const CMD_DIGITAL_READ: u8 = 1;
const CMD_ANALOG_READ: u8 = 3;

pub struct GrovePi<I2C> {
    bus: I2C,
    address: u8,
}

impl<I2C: I2c> GrovePi<I2C> {
    pub fn new(bus: I2C) -> Self {
        Self::with_address(bus, GROVEPI_I2C_ADDR)
    }

    pub fn with_address(bus: I2C, address: u8) -> Self {
        Self { bus, address }
    }

    /// 10-bit reading from analog port `pin`.
    pub fn analog_read(&mut self, pin: u8) -> Result<u16, SensorError> {
        self.command(CMD_ANALOG_READ, pin)?;
        let mut reply = [0u8; 3];
        self.read(&mut reply)?;
        Ok((u16::from(reply[1]) << 8) | u16::from(reply[2]))
    }

    /// Level of digital port `pin`.
    pub fn digital_read(&mut self, pin: u8) -> Result<bool, SensorError> {
        self.command(CMD_DIGITAL_READ, pin)?;
        let mut reply = [0u8; 1];
        self.read(&mut reply)?;
        match reply[0] {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(SensorError::UnexpectedReply),
        }
    }

    /// Hand the bus back.
    pub fn release(self) -> I2C {
        self.bus
    }

    fn command(&mut self, cmd: u8, pin: u8) -> Result<(), SensorError> {
        self.bus
            .write(self.address, &[REG_COMMAND, cmd, pin, 0, 0])
            .map_err(|e| {
                debug!("GrovePi cmd {} pin {}: {:?}", cmd, pin, e.kind());
                SensorError::BusWriteFailed
            })
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), SensorError> {
        self.bus.read(self.address, buf).map_err(|e| {
            debug!("GrovePi read: {:?}", e.kind());
            SensorError::BusReadFailed
        })
    }
}

/// Shared GrovePi handle.
pub type SharedGrovePi<I2C> = Arc<Mutex<GrovePi<I2C>>>;

pub fn shared<I2C: I2c>(grovepi: GrovePi<I2C>) -> SharedGrovePi<I2C> {
    Arc::new(Mutex::new(grovepi))
}

// ---------------------------------------------------------------------------
// Port handles
// ---------------------------------------------------------------------------

/// One analog port on a shared hat.
pub struct GroveAnalogPin<I2C> {
    hat: SharedGrovePi<I2C>,
    pin: u8,
}

impl<I2C> GroveAnalogPin<I2C> {
    pub fn new(hat: SharedGrovePi<I2C>, pin: u8) -> Self {
        Self { hat, pin }
    }
}

impl<I2C: I2c> AnalogInput for GroveAnalogPin<I2C> {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        self.hat
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .analog_read(self.pin)
    }
}

/// One digital port on a shared hat, usable wherever an `InputPin` is.
pub struct GroveDigitalPin<I2C> {
    hat: SharedGrovePi<I2C>,
    pin: u8,
}

impl<I2C> GroveDigitalPin<I2C> {
    pub fn new(hat: SharedGrovePi<I2C>, pin: u8) -> Self {
        Self { hat, pin }
    }
}

impl<I2C> ErrorType for GroveDigitalPin<I2C> {
    type Error = SensorError;
}

impl<I2C: I2c> InputPin for GroveDigitalPin<I2C> {
    fn is_high(&mut self) -> Result<bool, SensorError> {
        self.hat
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .digital_read(self.pin)
    }

    fn is_low(&mut self) -> Result<bool, SensorError> {
        self.is_high().map(|high| !high)
    }
}
