//! Grove-LCD RGB Backlight driver (16x2 text, PCA9633 backlight).
//!
//! Two I2C devices share one bus:
//!
//! - text controller at `0x3E`: `[0x80, cmd]` for commands, `[0x40, ch]`
//!   for one character of data;
//! - backlight at `0x62`: `[reg, value]` register writes.
//!
//! Text wraps to the second row after 16 characters or on `'\n'`; anything
//! past 32 characters is dropped.

use embedded_hal::i2c::{Error as _, I2c};
use log::debug;

use crate::app::events::Indicator;
use crate::app::ports::Display;
use crate::error::DisplayError;
use crate::pins::{LCD_RGB_I2C_ADDR, LCD_TEXT_I2C_ADDR};

pub const COLUMNS: usize = 16;
pub const ROWS: usize = 2;

const TEXT_CMD: u8 = 0x80;
const TEXT_DATA: u8 = 0x40;

const CMD_CLEAR: u8 = 0x01;
const CMD_DISPLAY_ON: u8 = 0x08 | 0x04;
const CMD_TWO_LINES: u8 = 0x28;
const CMD_SECOND_ROW: u8 = 0xC0;

const REG_MODE1: u8 = 0x00;
const REG_MODE2: u8 = 0x01;
const REG_OUTPUT: u8 = 0x08;
const REG_RED: u8 = 0x04;
const REG_GREEN: u8 = 0x03;
const REG_BLUE: u8 = 0x02;

pub struct RgbLcd<I2C> {
    bus: I2C,
    rgb: (u8, u8, u8),
}

impl<I2C: I2c> RgbLcd<I2C> {
    /// Take the bus and bring the panel up blank with the backlight off.
    pub fn new(bus: I2C) -> Result<Self, DisplayError> {
        let mut lcd = Self { bus, rgb: (0, 0, 0) };
        lcd.command(CMD_DISPLAY_ON)?;
        lcd.command(CMD_TWO_LINES)?;
        lcd.set_rgb(0, 0, 0)?;
        lcd.set_text("")?;
        Ok(lcd)
    }

    pub fn set_rgb(&mut self, r: u8, g: u8, b: u8) -> Result<(), DisplayError> {
        for (reg, value) in [
            (REG_MODE1, 0x00),
            (REG_MODE2, 0x00),
            (REG_OUTPUT, 0xAA),
            (REG_RED, r),
            (REG_GREEN, g),
            (REG_BLUE, b),
        ] {
            self.bus
                .write(LCD_RGB_I2C_ADDR, &[reg, value])
                .map_err(|e| {
                    debug!("LCD backlight reg {:#04x}: {:?}", reg, e.kind());
                    DisplayError::BacklightBus
                })?;
        }
        self.rgb = (r, g, b);
        Ok(())
    }

    /// Clear the panel and write `text` from the top-left corner.
    pub fn set_text(&mut self, text: &str) -> Result<(), DisplayError> {
        self.command(CMD_CLEAR)?;

        let mut row = 0;
        let mut col = 0;
        for ch in text.chars() {
            if ch == '\n' || col == COLUMNS {
                row += 1;
                col = 0;
                if row == ROWS {
                    break;
                }
                self.command(CMD_SECOND_ROW)?;
                if ch == '\n' {
                    continue;
                }
            }
            self.data(glyph(ch))?;
            col += 1;
        }
        Ok(())
    }

    /// Last backlight colour written.
    pub fn rgb(&self) -> (u8, u8, u8) {
        self.rgb
    }

    pub fn bus(&self) -> &I2C {
        &self.bus
    }

    pub fn release(self) -> I2C {
        self.bus
    }

    fn command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.text_write(TEXT_CMD, cmd)
    }

    fn data(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.text_write(TEXT_DATA, byte)
    }

    fn text_write(&mut self, control: u8, byte: u8) -> Result<(), DisplayError> {
        self.bus
            .write(LCD_TEXT_I2C_ADDR, &[control, byte])
            .map_err(|e| {
                debug!("LCD text write: {:?}", e.kind());
                DisplayError::TextBus
            })
    }

    fn show(&mut self, text: &str, indicator: Indicator) -> Result<(), DisplayError> {
        let (r, g, b) = indicator.rgb();
        self.set_rgb(r, g, b)?;
        self.set_text(text)
    }
}

/// The HD44780 ROM only covers ASCII reliably.
fn glyph(ch: char) -> u8 {
    if ch.is_ascii() && !ch.is_ascii_control() {
        ch as u8
    } else {
        b'?'
    }
}

impl<I2C: I2c> Display for RgbLcd<I2C> {
    fn show_message(&mut self, text: &str) -> Result<(), DisplayError> {
        self.show(text, Indicator::Neutral)
    }

    fn show_error(&mut self, text: &str) -> Result<(), DisplayError> {
        self.show(text, Indicator::Alert)
    }
}
