//! Console stand-in for the operator LCD.

use log::{info, warn};

use crate::app::events::Indicator;
use crate::app::ports::Display;
use crate::error::DisplayError;

/// Logs each update and remembers the last one.
#[derive(Debug, Default)]
pub struct LogDisplay {
    last: Option<(String, Indicator)>,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text and indicator currently "on screen".
    pub fn current(&self) -> Option<(&str, Indicator)> {
        self.last.as_ref().map(|(text, ind)| (text.as_str(), *ind))
    }
}

impl Display for LogDisplay {
    fn show_message(&mut self, text: &str) -> Result<(), DisplayError> {
        info!("LCD | {}", text);
        self.last = Some((text.to_owned(), Indicator::Neutral));
        Ok(())
    }

    fn show_error(&mut self, text: &str) -> Result<(), DisplayError> {
        warn!("LCD [alert] | {}", text);
        self.last = Some((text.to_owned(), Indicator::Alert));
        Ok(())
    }
}
