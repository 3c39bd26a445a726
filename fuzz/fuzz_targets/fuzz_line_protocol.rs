//! Fuzz target: line-protocol sink
//!
//! Writes events and status reports with arbitrary labels and messages and
//! verifies:
//! - No panics on any UTF-8 input
//! - Every report is exactly one newline-terminated line
//! - The measurement name and timestamp are never disturbed by escaping
//!
//! cargo fuzz run fuzz_line_protocol

#![no_main]

use libfuzzer_sys::fuzz_target;
use linewatch::adapters::line_protocol::{EVENT_MEASUREMENT, LineProtocolSink, STATUS_MEASUREMENT};
use linewatch::app::events::{Destination, DomainEvent, StatusKind};
use linewatch::app::ports::EventSink;

fn stamp() -> u128 {
    1
}

fuzz_target!(|input: (&str, &str, bool)| {
    let (label, message, good) = input;
    let mut sink = LineProtocolSink::with_clock(Vec::new(), stamp);

    let event = DomainEvent {
        destination: Destination::A,
        good: Some(good),
        at_ms: 0,
    };
    sink.report_event(&event, label).expect("Vec never fails");
    sink.report_status(StatusKind::Error, message)
        .expect("Vec never fails");

    let out = String::from_utf8(sink.into_inner()).expect("escaping keeps UTF-8");
    let lines: Vec<&str> = out.split_terminator('\n').collect();
    assert_eq!(lines.len(), 2, "{out:?}");
    assert!(lines[0].starts_with(EVENT_MEASUREMENT));
    assert!(lines[1].starts_with(STATUS_MEASUREMENT));
    assert!(lines.iter().all(|l| l.ends_with(" 1")));
});
