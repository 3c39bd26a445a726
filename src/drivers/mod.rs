//! Bus-level drivers for the Grove hardware, generic over `embedded-hal` 1.0.

pub mod button;
pub mod grovepi;
pub mod rgb_lcd;
