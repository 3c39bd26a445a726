//! One dispensing line: the service plus its ports behind a single lock.
//!
//! The tick loop and the override input run on different threads.  Both go
//! through the same mutex, and a tick holds it from sample snapshot to the
//! last display write, so an override lands either entirely before or
//! entirely after a tick.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::SystemConfig;
use crate::error::Error;
use crate::fsm::RunState;

use super::commands::AppCommand;
use super::ports::LinePorts;
use super::service::{AcquisitionService, Telemetry};

struct Inner<P> {
    service: AcquisitionService,
    ports: P,
}

fn lock<P>(inner: &Mutex<Inner<P>>) -> MutexGuard<'_, Inner<P>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared handle to a running line.  Cloning yields another handle.
pub struct Station<P> {
    inner: Arc<Mutex<Inner<P>>>,
}

impl<P> Clone for Station<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: LinePorts> Station<P> {
    /// Build the service and start it against `ports`.
    pub fn start(config: SystemConfig, mut ports: P) -> Result<Self, Error> {
        let mut service = AcquisitionService::new(config);
        service.start(&mut ports)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner { service, ports })),
        })
    }

    /// Run one controller tick under the lock.
    pub fn tick(&self) -> Result<(), Error> {
        let mut guard = lock(&self.inner);
        let Inner { service, ports } = &mut *guard;
        service.tick(ports)
    }

    /// Validate and apply new tunables.
    pub fn update_config(&self, config: SystemConfig) -> Result<(), Error> {
        let mut guard = lock(&self.inner);
        let Inner { service, ports } = &mut *guard;
        service.handle_command(AppCommand::UpdateConfig(config), ports)
    }

    /// Handle for the override input thread.
    pub fn override_handle(&self) -> OverrideHandle<P> {
        OverrideHandle {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn state(&self) -> RunState {
        lock(&self.inner).service.state()
    }

    pub fn telemetry(&self) -> Telemetry {
        lock(&self.inner).service.telemetry()
    }

    pub fn current_config(&self) -> SystemConfig {
        lock(&self.inner).service.current_config()
    }

    /// Run `f` against the ports under the lock.
    pub fn with_ports<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        f(&mut lock(&self.inner).ports)
    }
}

/// The operator's manual override.  Payload-free; each call is one press.
pub struct OverrideHandle<P> {
    inner: Arc<Mutex<Inner<P>>>,
}

impl<P> Clone for OverrideHandle<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: LinePorts> OverrideHandle<P> {
    /// Pause, resume, or clear a fault.  Visible to the very next tick.
    pub fn press(&self) -> Result<RunState, Error> {
        let mut guard = lock(&self.inner);
        let Inner { service, ports } = &mut *guard;
        service.handle_command(AppCommand::ManualOverride, ports)?;
        Ok(service.state())
    }
}
