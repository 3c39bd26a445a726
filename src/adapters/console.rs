//! Operator inputs: stdin commands and the override push-button.
//!
//! Both feed the same [`OverrideHandle`], so a press from the keyboard and
//! a press on the panel are indistinguishable to the controller.  A press
//! that could not reach the display ends the input loop with that error;
//! the caller treats it like a failed tick.
//!
//! | Line             | Action                                   |
//! |------------------|------------------------------------------|
//! | *(empty)*, `p`   | manual override (pause / resume / clear) |
//! | `r`, `reload`    | re-read the config file and apply it     |
//! | `s`, `status`    | log a telemetry line                     |

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use embedded_hal::digital::InputPin;
use log::{info, warn};

use crate::app::ports::{ConfigPort, LinePorts, TimePort};
use crate::app::station::{OverrideHandle, Station};
use crate::drivers::button::PressDetector;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Press,
    Reload,
    Status,
}

/// Parse one input line.  `None` for anything unrecognised.
pub fn parse(line: &str) -> Option<ConsoleCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "p" | "press" => Some(ConsoleCommand::Press),
        "r" | "reload" => Some(ConsoleCommand::Reload),
        "s" | "status" => Some(ConsoleCommand::Status),
        _ => None,
    }
}

/// Read commands from `input` until EOF.  Returns the number of override
/// presses delivered.
pub fn run<R, P, C>(input: R, station: &Station<P>, config: &C) -> Result<usize, Error>
where
    R: BufRead,
    P: LinePorts,
    C: ConfigPort,
{
    let handle = station.override_handle();
    let mut presses = 0;

    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Console read failed: {}", e);
                break;
            }
        };

        match parse(&line) {
            Some(ConsoleCommand::Press) => {
                let state = handle.press()?;
                presses += 1;
                info!("Override -> {:?}", state);
            }
            Some(ConsoleCommand::Reload) => match config.load() {
                Ok(cfg) => match station.update_config(cfg) {
                    Ok(()) => info!("Config reloaded"),
                    Err(e) => warn!("Config rejected: {}", e),
                },
                Err(e) => warn!("Config reload failed: {}", e),
            },
            Some(ConsoleCommand::Status) => info!("TELEM | {}", station.telemetry()),
            None => warn!("Unknown command {:?} (p, r, s)", line.trim()),
        }
    }

    info!("Console input closed");
    Ok(presses)
}

/// Poll `button` every `period` until `running` clears, forwarding each
/// debounced press to `handle`.  Pin read errors are logged and retried.
pub fn watch_button<B, P, T>(
    mut button: PressDetector<B>,
    handle: &OverrideHandle<P>,
    clock: &T,
    period: Duration,
    running: &AtomicBool,
) -> Result<(), Error>
where
    B: InputPin,
    P: LinePorts,
    T: TimePort,
{
    while running.load(Ordering::Acquire) {
        match button.poll(clock.uptime_ms()) {
            Ok(true) => {
                let state = handle.press()?;
                info!("Button override -> {:?}", state);
            }
            Ok(false) => {}
            Err(e) => warn!("Button read failed: {:?}", e),
        }
        thread::sleep(period);
    }
    Ok(())
}
