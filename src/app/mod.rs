//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the line monitor: FSM
//! orchestration, event forwarding and the manual override.  All
//! interaction with sensors, the sink and the display happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod station;
