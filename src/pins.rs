//! Grove port and I2C address assignments for the dispensing-line station.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding port numbers.  Change a port here and it propagates everywhere.
//!
//! Port assignments match the GrovePi+ hat wiring used on the line: the
//! arm's rotary angle sensor sits on A1, the two light gates on A2/A0, the
//! operator button on D5 and the RGB LCD on the shared I2C header.

// ---------------------------------------------------------------------------
// GrovePi+ co-processor
// ---------------------------------------------------------------------------

/// 7-bit I2C address of the GrovePi+ ATmega co-processor.
pub const GROVEPI_I2C_ADDR: u8 = 0x04;

// ---------------------------------------------------------------------------
// Analog inputs
// ---------------------------------------------------------------------------

/// Rotary angle sensor on the dispensing arm (0–300°).
pub const ROTARY_PORT: u8 = 1;
/// Light gate in front of outlet A.
pub const LIGHT_GATE_A_PORT: u8 = 2;
/// Light gate in front of outlet B.
pub const LIGHT_GATE_B_PORT: u8 = 0;

// ---------------------------------------------------------------------------
// Digital inputs
// ---------------------------------------------------------------------------

/// Operator push-button (active HIGH on Grove modules).
pub const BUTTON_PORT: u8 = 5;

// ---------------------------------------------------------------------------
// Grove-LCD RGB Backlight
// ---------------------------------------------------------------------------

/// HD44780-compatible text controller.
pub const LCD_TEXT_I2C_ADDR: u8 = 0x3E;
/// PCA9633 backlight controller.
pub const LCD_RGB_I2C_ADDR: u8 = 0x62;
