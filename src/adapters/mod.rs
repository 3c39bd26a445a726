//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter          | Implements            | Connects to                  |
//! |------------------|-----------------------|------------------------------|
//! | `config_file`    | ConfigPort            | JSON file on disk            |
//! | `console`        | (override input)      | stdin, panel push-button     |
//! | `grove`          | (wiring)              | GrovePi sensors, button, LCD |
//! | `judge`          | QualityJudge          | RNG / fixed verdict          |
//! | `line`           | SensorPort + all      | sample cells, bundled ports  |
//! | `line_protocol`  | EventSink             | InfluxDB line protocol (UDP) |
//! | `log_display`    | Display               | Log output                   |
//! | `log_sink`       | EventSink             | Log output                   |
//! | `sim`            | AnalogInput           | Simulated arm and gates      |
//! | `time`           | TimePort              | `std::time::Instant`         |

pub mod config_file;
pub mod console;
pub mod grove;
pub mod judge;
pub mod line;
pub mod line_protocol;
pub mod log_display;
pub mod log_sink;
pub mod sim;
pub mod time;
