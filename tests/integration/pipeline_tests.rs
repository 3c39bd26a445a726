//! End-to-end: GrovePi analog ports → sensors → sample cells → station →
//! line-protocol sink and RGB LCD, with both I2C buses simulated.

use std::sync::{Arc, Mutex};

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};

use linewatch::adapters::grove::GroveLine;
use linewatch::adapters::judge::FixedJudge;
use linewatch::adapters::line::{LineAdapter, LineCells};
use linewatch::adapters::line_protocol::LineProtocolSink;
use linewatch::app::events::{Destination, Indicator};
use linewatch::app::ports::TimePort;
use linewatch::app::station::Station;
use linewatch::config::SystemConfig;
use linewatch::drivers::button::PressDetector;
use linewatch::drivers::grovepi::{GroveAnalogPin, GroveDigitalPin};
use linewatch::drivers::rgb_lcd::RgbLcd;
use linewatch::fsm::RunState;
use linewatch::pins::{BUTTON_PORT, LIGHT_GATE_A_PORT, LIGHT_GATE_B_PORT, ROTARY_PORT};
use linewatch::sensors::Sensor;
use linewatch::sensors::light::LightSensor;
use linewatch::sensors::rotary::{RotarySensor, degrees_to_raw};

// ── Simulated GrovePi hat ─────────────────────────────────────

/// Answers analog and digital reads from a table of per-port levels.
#[derive(Clone, Default)]
struct Hat {
    levels: Arc<Mutex<[u16; 8]>>,
    pending: Option<(u8, u8)>,
}

impl Hat {
    fn set(&self, pin: u8, raw: u16) {
        self.levels.lock().unwrap()[usize::from(pin)] = raw;
    }
}

impl ErrorType for Hat {
    type Error = ErrorKind;
}

impl I2c for Hat {
    fn transaction(&mut self, _address: u8, ops: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
        for op in ops {
            match op {
                Operation::Write([1, cmd @ (1 | 3), pin, 0, 0]) => {
                    self.pending = Some((*cmd, *pin));
                }
                Operation::Write(_) => return Err(ErrorKind::Other),
                Operation::Read(buf) => {
                    let (cmd, pin) = self.pending.take().ok_or(ErrorKind::Other)?;
                    let raw = self.levels.lock().unwrap()[usize::from(pin)];
                    if cmd == 1 {
                        buf[0] = u8::from(raw > 0);
                    } else {
                        buf[0] = 3;
                        buf[1] = (raw >> 8) as u8;
                        buf[2] = (raw & 0xFF) as u8;
                    }
                }
            }
        }
        Ok(())
    }
}

// ── Simulated LCD bus ─────────────────────────────────────────

/// Reconstructs the panel text from character writes.
#[derive(Default)]
struct Panel {
    text: String,
}

impl ErrorType for Panel {
    type Error = ErrorKind;
}

impl I2c for Panel {
    fn transaction(&mut self, address: u8, ops: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
        for op in ops {
            if let (0x3E, Operation::Write([control, byte])) = (address, op) {
                match (*control, *byte) {
                    (0x80, 0x01) => self.text.clear(),
                    (0x80, 0xC0) => self.text.push('\n'),
                    (0x40, ch) => self.text.push(char::from(ch)),
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

// ── Harness ───────────────────────────────────────────────────

#[derive(Clone, Copy)]
struct Frozen;

impl TimePort for Frozen {
    fn uptime_ms(&self) -> u64 {
        1_000
    }
}

fn stamp() -> u128 {
    7
}

type Line = LineAdapter<LineProtocolSink<Vec<u8>>, RgbLcd<Panel>, FixedJudge, Frozen>;

struct Rig {
    hat: Hat,
    button: PressDetector<GroveDigitalPin<Hat>>,
    rotary: RotarySensor<GroveAnalogPin<Hat>>,
    gates: [LightSensor<GroveAnalogPin<Hat>>; 2],
    cells: LineCells,
    station: Station<Line>,
}

impl Rig {
    fn new() -> Self {
        let hat = Hat::default();
        let GroveLine {
            rotary,
            gates,
            button,
            lcd,
        } = GroveLine::new(hat.clone(), Panel::default()).unwrap();
        let cells = LineCells::new();
        let line = LineAdapter::new(
            cells.clone(),
            LineProtocolSink::with_clock(Vec::new(), stamp),
            lcd,
            FixedJudge(true),
            Frozen,
        );
        Self {
            hat,
            button,
            rotary,
            gates,
            cells,
            station: Station::start(SystemConfig::default(), line).unwrap(),
        }
    }

    /// One monitor pass over every channel, then one controller tick.
    fn step(&mut self, rotary_deg: f32, gate_a: u16, gate_b: u16) {
        self.hat.set(ROTARY_PORT, degrees_to_raw(rotary_deg));
        self.hat.set(LIGHT_GATE_A_PORT, gate_a);
        self.hat.set(LIGHT_GATE_B_PORT, gate_b);

        self.cells.rotary.store(self.rotary.read().unwrap(), 0);
        for d in Destination::ALL {
            let v = self.gates[d.index()].read().unwrap();
            self.cells.gate(d).store(v, 0);
        }
        self.station.tick().unwrap();
    }

    fn sink_lines(&self) -> Vec<String> {
        self.station.with_ports(|line| {
            String::from_utf8(line.sink().get_ref().clone())
                .unwrap()
                .lines()
                .map(str::to_owned)
                .collect()
        })
    }

    fn panel(&self) -> (String, (u8, u8, u8)) {
        self.station.with_ports(|line| {
            let lcd = line.display();
            (lcd.bus().text.clone(), lcd.rgb())
        })
    }
}

#[test]
fn start_reaches_sink_and_panel() {
    let rig = Rig::new();
    assert_eq!(
        rig.sink_lines(),
        vec!["status,type=active message=\"Machine started: wait activation\" 7"]
    );
    let (text, rgb) = rig.panel();
    assert_eq!(text, "Waiting...");
    assert_eq!(rgb, Indicator::Neutral.rgb());
}

#[test]
fn objects_at_both_gates_become_points() {
    let mut rig = Rig::new();
    rig.step(190.0, 620, 620);
    rig.step(40.0, 380, 620);
    rig.step(40.0, 620, 620);
    rig.step(190.0, 620, 370);

    let lines = rig.sink_lines();
    assert_eq!(
        &lines[1..],
        [
            "beer,where=Svizzera count=1i,good=true 7",
            "beer,where=Italia count=1i,good=true 7",
        ]
    );
    assert_eq!(rig.station.telemetry().edges_accepted, 1);
}

#[test]
fn override_shows_on_the_panel() {
    let rig = Rig::new();
    rig.station.override_handle().press().unwrap();
    assert_eq!(rig.station.state(), RunState::Paused);
    assert_eq!(rig.panel().0, "In idle...");
    assert_eq!(
        rig.sink_lines().last().map(String::as_str),
        Some("status,type=inactive message=\"\" 7")
    );
}

#[test]
fn panel_button_press_pauses_once() {
    let mut rig = Rig::new();
    let handle = rig.station.override_handle();

    // Held for several polls, then released: one press.
    for (t, level) in [(0, 1), (100, 1), (200, 1), (300, 0), (400, 0)] {
        rig.hat.set(BUTTON_PORT, level);
        if rig.button.poll(t).unwrap() {
            handle.press().unwrap();
        }
    }
    assert_eq!(rig.station.state(), RunState::Paused);
    assert!(!rig.button.is_pressed());
}
