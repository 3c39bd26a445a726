//! Dispensing-line event monitor.
//!
//! Watches a rotary arm and two light gates, turns their readings into
//! "object passed outlet X" events, and runs a small RUNNING / PAUSED /
//! FAULTED controller with a liveness watchdog and a manual override.
//! Hardware and I/O sit behind the port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod detect;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod sensors;
