//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing events and status reports through the
//! `log` facade.  Used for bench runs and as the fall-back sink when the
//! real one cannot be opened.

use log::info;

use crate::app::events::{DomainEvent, StatusKind};
use crate::app::ports::EventSink;
use crate::error::SinkError;

/// Adapter that logs every event to the console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn report_event(&mut self, event: &DomainEvent, label: &str) -> Result<(), SinkError> {
        match event.good {
            Some(good) => info!(
                "EVENT | where={} good={} t={}ms",
                label, good, event.at_ms
            ),
            None => info!("EVENT | where={} t={}ms", label, event.at_ms),
        }
        Ok(())
    }

    fn report_status(&mut self, kind: StatusKind, message: &str) -> Result<(), SinkError> {
        if message.is_empty() {
            info!("STATUS | {}", kind);
        } else {
            info!("STATUS | {} | {}", kind, message);
        }
        Ok(())
    }
}
