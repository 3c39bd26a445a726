//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (button, console)
//! that the [`AcquisitionService`](super::service::AcquisitionService)
//! interprets and acts upon.

use crate::config::SystemConfig;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Operator pressed the override button: pause, resume, or clear a fault.
    ManualOverride,

    /// Hot-reload configuration (e.g. after the config file was edited).
    UpdateConfig(SystemConfig),
}
