//! InfluxDB line-protocol sink.
//!
//! ```text
//! beer,where=Svizzera count=1i,good=true 1700000000000000000
//! status,type=error message="Timeout: no dispensing activity" 1700000000000000000
//! ```
//!
//! One line per [`Write::write_all`], so over [`UdpWriter`] every point is a
//! single datagram.  Timestamps are wall-clock nanoseconds since the epoch.

use std::io::{self, Write};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;

use crate::app::events::{DomainEvent, StatusKind};
use crate::app::ports::EventSink;
use crate::error::SinkError;

/// Measurement for objects passing a gate.
pub const EVENT_MEASUREMENT: &str = "beer";
/// Measurement for run-state reports.
pub const STATUS_MEASUREMENT: &str = "status";

/// Wall-clock nanoseconds since the Unix epoch; zero if the clock is
/// before the epoch.
pub fn wall_clock_ns() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0)
}

pub struct LineProtocolSink<W> {
    out: W,
    now_ns: fn() -> u128,
}

impl<W: Write> LineProtocolSink<W> {
    pub fn new(out: W) -> Self {
        Self::with_clock(out, wall_clock_ns)
    }

    /// Use `now_ns` for point timestamps.
    pub fn with_clock(out: W, now_ns: fn() -> u128) -> Self {
        Self { out, now_ns }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str) -> Result<(), SinkError> {
        debug!("sink <- {}", line.trim_end());
        self.out.write_all(line.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> EventSink for LineProtocolSink<W> {
    fn report_event(&mut self, event: &DomainEvent, label: &str) -> Result<(), SinkError> {
        let mut line = format!("{},where={} count=1i", EVENT_MEASUREMENT, escape_tag(label));
        if let Some(good) = event.good {
            line.push_str(if good { ",good=true" } else { ",good=false" });
        }
        line.push_str(&format!(" {}\n", (self.now_ns)()));
        self.emit(&line)
    }

    fn report_status(&mut self, kind: StatusKind, message: &str) -> Result<(), SinkError> {
        let line = format!(
            "{},type={} message=\"{}\" {}\n",
            STATUS_MEASUREMENT,
            kind.as_str(),
            escape_field(message),
            (self.now_ns)()
        );
        self.emit(&line)
    }
}

/// Escape a tag value: commas, equals signs and spaces.  Line breaks
/// cannot be escaped and become spaces.
pub fn escape_tag(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        let ch = flatten(ch);
        if matches!(ch, ',' | '=' | ' ') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Escape a string field value: double quotes and backslashes.  Line
/// breaks become spaces.
pub fn escape_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        let ch = flatten(ch);
        if matches!(ch, '"' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn flatten(ch: char) -> char {
    if matches!(ch, '\n' | '\r') { ' ' } else { ch }
}

// ---------------------------------------------------------------------------
// UDP transport
// ---------------------------------------------------------------------------

/// `Write` adapter that sends every `write` call as one datagram.
pub struct UdpWriter {
    socket: UdpSocket,
}

impl UdpWriter {
    /// Bind an ephemeral local port and connect it to `addr` (`host:port`).
    pub fn connect(addr: &str) -> io::Result<Self> {
        let target = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "sink address did not resolve"))?;
        let local: SocketAddr = match target {
            SocketAddr::V4(_) => ([0, 0, 0, 0], 0).into(),
            SocketAddr::V6(_) => ([0u16; 8], 0).into(),
        };
        let socket = UdpSocket::bind(local)?;
        socket.connect(target)?;
        Ok(Self { socket })
    }

    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.socket.peer_addr()
    }
}

impl Write for UdpWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.socket.send(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
