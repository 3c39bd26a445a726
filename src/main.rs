//! linewatch: dispensing-line event monitor entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  SensorMonitor ×3   LineProtocolSink   RgbLcd or    Console  │
//! │  (GrovePi or sim)   (EventSink)        LogDisplay   + button │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ───────────────         │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │          AcquisitionService (pure logic)             │    │
//! │  │  FSM · EdgeDetector · ThresholdDetector · Liveness   │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `linewatch [config.json]`.  Type `p` + Enter (or just Enter) for
//! the manual override, `r` to reload the config, `s` for telemetry.
//!
//! With `i2c_bus` set in the config (and the `grovepi` feature built in)
//! the sensors, the override button and the LCD are read from a GrovePi
//! hat on that bus.  Without it the line is simulated and the display goes
//! to the log.

use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use log::{error, info};

use linewatch::adapters::config_file::{DEFAULT_CONFIG_PATH, JsonConfigFile};
use linewatch::adapters::console;
use linewatch::adapters::judge::RandomJudge;
use linewatch::adapters::line::{LineAdapter, LineCells};
use linewatch::adapters::line_protocol::{LineProtocolSink, UdpWriter};
use linewatch::adapters::log_display::LogDisplay;
use linewatch::adapters::log_sink::LogEventSink;
use linewatch::adapters::sim::{SimulatedArm, SimulatedGate};
use linewatch::adapters::time::MonotonicClock;
use linewatch::app::events::Destination;
use linewatch::app::ports::{ConfigPort, Display, LinePorts};
use linewatch::app::service::AcquisitionService;
use linewatch::app::station::Station;
use linewatch::config::SystemConfig;
use linewatch::error::Error;
use linewatch::sensors::light::LightSensor;
use linewatch::sensors::rotary::RotarySensor;
use linewatch::sensors::{Sensor, SensorMonitor};

/// Chance per simulated gate reading that an object is passing.
const SIM_PASS_PROBABILITY: f64 = 0.05;

type Sink = LineProtocolSink<Box<dyn Write + Send>>;
type Line<D> = LineAdapter<Sink, D, RandomJudge, MonotonicClock>;

fn open_sink(config: &SystemConfig) -> io::Result<Sink> {
    let out: Box<dyn Write + Send> = match &config.sink_addr {
        Some(addr) => {
            let udp = UdpWriter::connect(addr)?;
            info!("Sink: line protocol over UDP to {}", udp.peer_addr()?);
            Box::new(udp)
        }
        None => {
            info!("Sink: line protocol on stdout");
            Box::new(io::stdout())
        }
    };
    Ok(LineProtocolSink::new(out))
}

/// Report a start-up failure through the log fall-backs and bail.
fn abort_start(reason: &str) -> anyhow::Error {
    let mut service = AcquisitionService::new(SystemConfig::default());
    if let Err(e) = service.fail_start(reason, &mut LogEventSink::new(), &mut LogDisplay::new()) {
        error!("Could not report start-up failure: {}", e);
    }
    anyhow!("start-up failed: {reason}")
}

// ── Start-up ──────────────────────────────────────────────────

/// What both input modes share once config and sink are up.
struct Boot {
    config: SystemConfig,
    config_file: JsonConfigFile,
    sink: Sink,
    cells: LineCells,
    clock: MonotonicClock,
}

impl Boot {
    /// One monitor thread per channel.
    fn spawn_monitors<R, G>(&self, rotary: R, [gate_a, gate_b]: [G; 2]) -> Result<Vec<SensorMonitor>>
    where
        R: Sensor + Send + 'static,
        G: Sensor + Send + 'static,
    {
        let interval = self.config.sensor_read_interval();
        let cell = |d| self.cells.gate(d).clone();
        [
            SensorMonitor::spawn(rotary, self.cells.rotary.clone(), self.clock, interval),
            SensorMonitor::spawn(gate_a, cell(Destination::A), self.clock, interval),
            SensorMonitor::spawn(gate_b, cell(Destination::B), self.clock, interval),
        ]
        .into_iter()
        .collect::<io::Result<Vec<_>>>()
        .context("spawning sensor monitors")
    }

    /// Start the controller against `display` and open the console.
    fn start<D>(self, display: D) -> Result<Running<Line<D>>>
    where
        D: Display + Send + 'static,
    {
        let judge = RandomJudge::new(self.config.good_probability);
        let line = LineAdapter::new(self.cells, self.sink, display, judge, self.clock);
        let station = Station::start(self.config, line).context("starting controller")?;

        let (fatal_tx, fatal) = mpsc::channel();
        let running = Running {
            station,
            fatal_tx,
            fatal,
        };
        running.spawn_console(self.config_file)?;
        Ok(running)
    }
}

fn run_simulated(boot: Boot) -> Result<()> {
    let gate = || LightSensor::new(SimulatedGate::new(SIM_PASS_PROBABILITY));
    let _monitors = boot.spawn_monitors(RotarySensor::new(SimulatedArm::new()), [gate(), gate()])?;
    boot.start(LogDisplay::new())?.tick_loop()
}

#[cfg(feature = "grovepi")]
fn run_grovepi(boot: Boot, bus: &str) -> Result<()> {
    use linewatch::adapters::grove::GroveLine;
    use linux_embedded_hal::I2cdev;

    let open = |what: &str| {
        I2cdev::new(bus).map_err(|e| abort_start(&format!("I2C {bus} ({what}): {e}")))
    };
    let GroveLine {
        rotary,
        gates,
        button,
        lcd,
    } = GroveLine::new(open("GrovePi")?, open("LCD")?)
        .map_err(|e| abort_start(&format!("LCD: {e}")))?;

    let clock = boot.clock;
    let _monitors = boot.spawn_monitors(rotary, gates)?;
    let running = boot.start(lcd)?;
    running.spawn_button(button, clock)?;
    running.tick_loop()
}

#[cfg(not(feature = "grovepi"))]
fn run_grovepi(_boot: Boot, bus: &str) -> Result<()> {
    Err(abort_start(&format!(
        "I2C {bus}: built without the grovepi feature"
    )))
}

// ── Running line ──────────────────────────────────────────────

/// A started line.  Operator threads send the error of an override that
/// could not be shown; the tick loop stops on it like on a failed tick.
struct Running<P> {
    station: Station<P>,
    fatal_tx: Sender<Error>,
    fatal: Receiver<Error>,
}

impl<P: LinePorts + Send + 'static> Running<P> {
    fn spawn_console(&self, config_file: JsonConfigFile) -> Result<()> {
        let station = self.station.clone();
        let fatal = self.fatal_tx.clone();
        thread::Builder::new()
            .name("console".into())
            .spawn(move || {
                if let Err(e) = console::run(io::stdin().lock(), &station, &config_file) {
                    let _ = fatal.send(e);
                }
            })
            .context("spawning console thread")?;
        Ok(())
    }

    #[cfg(feature = "grovepi")]
    fn spawn_button<B>(
        &self,
        button: linewatch::drivers::button::PressDetector<B>,
        clock: MonotonicClock,
    ) -> Result<()>
    where
        B: embedded_hal::digital::InputPin + Send + 'static,
    {
        const BUTTON_POLL: Duration = Duration::from_millis(20);

        let handle = self.station.override_handle();
        let fatal = self.fatal_tx.clone();
        thread::Builder::new()
            .name("button".into())
            .spawn(move || {
                let running = std::sync::atomic::AtomicBool::new(true);
                if let Err(e) = console::watch_button(button, &handle, &clock, BUTTON_POLL, &running)
                {
                    let _ = fatal.send(e);
                }
            })
            .context("spawning button thread")?;
        Ok(())
    }

    fn tick_loop(self) -> Result<()> {
        let mut last_telemetry = Instant::now();
        loop {
            let cfg = self.station.current_config();
            thread::sleep(cfg.tick_interval());

            if let Ok(e) = self.fatal.try_recv() {
                return Err(anyhow::Error::new(e).context("manual override"));
            }
            self.station.tick().context("controller tick")?;

            let every = Duration::from_secs(u64::from(cfg.telemetry_interval_secs));
            if !every.is_zero() && last_telemetry.elapsed() >= every {
                info!("TELEM | {}", self.station.telemetry());
                last_telemetry = Instant::now();
            }
        }
    }
}

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("linewatch {} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_owned());
    let config_file = JsonConfigFile::new(path);
    info!("Config file: {}", config_file.path().display());
    let config = config_file
        .load()
        .map_err(|e| abort_start(&format!("Config: {e}")))?;
    info!("Config: {:?}", config);

    // ── 3. Sink ───────────────────────────────────────────────
    let sink = open_sink(&config).map_err(|e| abort_start(&format!("Sink: {e}")))?;

    // ── 4. Inputs, controller, tick loop ──────────────────────
    let bus = config.i2c_bus.clone();
    let boot = Boot {
        config,
        config_file,
        sink,
        cells: LineCells::new(),
        clock: MonotonicClock::new(),
    };
    match bus {
        Some(bus) => {
            info!("Inputs: GrovePi on {}", bus);
            run_grovepi(boot, &bus)
        }
        None => {
            info!("Inputs: simulated line");
            run_simulated(boot)
        }
    }
}
