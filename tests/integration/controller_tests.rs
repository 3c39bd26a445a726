//! Integration tests for the samples → detectors → FSM → sink/display chain.
//!
//! Drives an `AcquisitionService` tick by tick against `MockLine`, with the
//! clock advanced by hand, and asserts on what reached the sink and the
//! display.

use linewatch::app::commands::AppCommand;
use linewatch::app::events::{Destination, Indicator, StatusKind};
use linewatch::app::service::AcquisitionService;
use linewatch::config::SystemConfig;
use linewatch::error::{ConfigError, DisplayError, Error};
use linewatch::fsm::RunState;
use linewatch::fsm::states::{
    MSG_STARTED, MSG_TIMEOUT, TEXT_PAUSED, TEXT_RUNNING, TEXT_TIMEOUT, TEXT_WAITING,
};

use super::mock_hw::MockLine;

const TICK_MS: u64 = 500;

fn make_app() -> (AcquisitionService, MockLine) {
    let mut app = AcquisitionService::new(SystemConfig::default());
    let mut line = MockLine::new();
    app.start(&mut line).unwrap();
    (app, line)
}

fn tick(app: &mut AcquisitionService, line: &mut MockLine) {
    line.advance(TICK_MS);
    app.tick(line).unwrap();
}

fn press(app: &mut AcquisitionService, line: &mut MockLine) {
    app.handle_command(AppCommand::ManualOverride, line).unwrap();
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn start_announces_and_waits() {
    let (app, line) = make_app();
    assert_eq!(app.state(), RunState::Running);
    assert_eq!(line.statuses, vec![(StatusKind::Active, MSG_STARTED.to_owned())]);
    assert_eq!(line.screen(), Some((TEXT_WAITING, Indicator::Neutral)));
    assert!(line.events.is_empty());
}

#[test]
fn failed_start_faults_with_reason() {
    let mut app = AcquisitionService::new(SystemConfig::default());
    let mut sink = MockLine::new();
    let mut display = MockLine::new();

    app.fail_start("Sink: connection refused", &mut sink, &mut display)
        .unwrap();

    assert_eq!(app.state(), RunState::Faulted);
    assert_eq!(
        sink.last_status(),
        Some((StatusKind::Error, "Sink: connection refused"))
    );
    assert_eq!(
        display.screen(),
        Some(("Sink: connection refused", Indicator::Alert))
    );
}

// ── Rotary detection ──────────────────────────────────────────

#[test]
fn arm_sweep_produces_one_edge_per_band_entry() {
    let (mut app, mut line) = make_app();
    for deg in [50.0, 50.0, 50.0, 150.0, 150.0, 310.0, 310.0, 50.0] {
        line.set_rotary(deg);
        tick(&mut app, &mut line);
    }
    assert_eq!(app.telemetry().edges_accepted, 3);
    // Rotary edges are liveness signals only; they never reach the sink.
    assert!(line.events.is_empty());
}

#[test]
fn arm_activity_keeps_the_line_alive() {
    let (mut app, mut line) = make_app();
    // Alternate outlets well inside every liveness window.
    for i in 0..200 {
        let deg = if (i / 10) % 2 == 0 { 50.0 } else { 310.0 };
        line.set_rotary(deg);
        tick(&mut app, &mut line);
    }
    assert_eq!(app.state(), RunState::Running);
    assert_eq!(line.count_status(StatusKind::Error), 0);
}

#[test]
fn invalid_rotary_sample_is_ignored() {
    let (mut app, mut line) = make_app();
    for _ in 0..5 {
        tick(&mut app, &mut line);
    }
    assert_eq!(app.telemetry().edges_accepted, 0);
    assert!(app.edge_armed());
}

#[test]
fn stale_reading_is_skipped_until_refreshed() {
    let (mut app, mut line) = make_app();
    let max_age = u64::from(SystemConfig::default().sample_max_age_ms);

    // A monitor that stopped refreshing: the last reading ages out.
    line.set_rotary(50.0);
    line.advance(max_age + 1);
    app.tick(&mut line).unwrap();
    assert_eq!(app.telemetry().edges_accepted, 0);
    assert!(app.edge_armed());

    line.set_rotary(50.0);
    tick(&mut app, &mut line);
    assert_eq!(app.telemetry().edges_accepted, 1);
}

// ── Light gates ───────────────────────────────────────────────

#[test]
fn light_gate_fires_on_each_sharp_change() {
    let (mut app, mut line) = make_app();
    let mut fired_at = Vec::new();
    for (i, v) in [10.0, 10.0, 35.0, 35.0, 10.0].into_iter().enumerate() {
        line.set_gate(Destination::A, v);
        let before = line.events.len();
        tick(&mut app, &mut line);
        if line.events.len() > before {
            fired_at.push(i);
        }
    }
    assert_eq!(fired_at, vec![2, 4]);
    assert_eq!(line.destinations(), vec![Destination::A, Destination::A]);
}

#[test]
fn events_carry_label_verdict_and_time() {
    let (mut app, mut line) = make_app();
    line.verdicts.extend([false, true]);

    line.set_gate(Destination::B, 600.0);
    tick(&mut app, &mut line);
    line.set_gate(Destination::B, 300.0);
    tick(&mut app, &mut line);
    line.set_gate(Destination::A, 600.0);
    tick(&mut app, &mut line);
    line.set_gate(Destination::A, 300.0);
    tick(&mut app, &mut line);

    let (first, label) = &line.events[0];
    assert_eq!(first.destination, Destination::B);
    assert_eq!(label, "Italia");
    assert_eq!(first.good, Some(false));
    assert_eq!(first.at_ms, 2 * TICK_MS);

    let (second, label) = &line.events[1];
    assert_eq!(label, "Svizzera");
    assert_eq!(second.good, Some(true));

    let t = app.telemetry();
    assert_eq!(t.events, [1, 1]);
    assert_eq!((t.good, t.bad), (1, 1));
}

#[test]
fn gates_are_independent_of_the_arm() {
    let (mut app, mut line) = make_app();
    line.set_rotary(150.0);
    line.set_gate(Destination::A, 500.0);
    line.set_gate(Destination::B, 500.0);
    tick(&mut app, &mut line);
    line.set_gate(Destination::A, 200.0);
    line.set_gate(Destination::B, 200.0);
    tick(&mut app, &mut line);
    assert_eq!(line.destinations(), vec![Destination::A, Destination::B]);
}

// ── Liveness ──────────────────────────────────────────────────

#[test]
fn no_activity_faults_exactly_once() {
    let (mut app, mut line) = make_app();
    let wait = u64::from(SystemConfig::default().liveness_wait_ms);

    let mut ticks = 0;
    while app.state() == RunState::Running {
        tick(&mut app, &mut line);
        ticks += 1;
        assert!(ticks * TICK_MS <= wait, "fault came late");
    }
    assert_eq!(line.now_ms, wait);
    assert_eq!(line.last_status(), Some((StatusKind::Error, MSG_TIMEOUT)));
    assert_eq!(line.screen(), Some((TEXT_TIMEOUT, Indicator::Alert)));

    // Faulted is a hard stop: no more reports and no detection.
    for v in [100.0, 900.0, 100.0, 900.0] {
        line.set_gate(Destination::A, v);
        line.set_rotary(50.0);
        tick(&mut app, &mut line);
    }
    assert_eq!(app.state(), RunState::Faulted);
    assert_eq!(line.count_status(StatusKind::Error), 1);
    assert!(line.events.is_empty());
    assert_eq!(app.telemetry().edges_accepted, 0);
}

#[test]
fn edge_restarts_the_liveness_window() {
    let (mut app, mut line) = make_app();
    let wait = u64::from(SystemConfig::default().liveness_wait_ms);

    line.advance(wait - TICK_MS);
    line.set_rotary(50.0);
    app.tick(&mut line).unwrap();

    line.advance(wait - TICK_MS);
    app.tick(&mut line).unwrap();
    assert_eq!(app.state(), RunState::Running);

    line.advance(TICK_MS);
    app.tick(&mut line).unwrap();
    assert_eq!(app.state(), RunState::Faulted);
}

// ── Manual override ───────────────────────────────────────────

#[test]
fn override_pauses_and_resumes() {
    let (mut app, mut line) = make_app();

    press(&mut app, &mut line);
    assert_eq!(app.state(), RunState::Paused);
    assert_eq!(line.last_status(), Some((StatusKind::Inactive, "")));
    assert_eq!(line.screen(), Some((TEXT_PAUSED, Indicator::Neutral)));

    press(&mut app, &mut line);
    assert_eq!(app.state(), RunState::Running);
    assert_eq!(line.last_status(), Some((StatusKind::Active, "")));
    assert_eq!(line.screen(), Some((TEXT_RUNNING, Indicator::Neutral)));
}

#[test]
fn paused_line_ignores_sensors_and_never_times_out() {
    let (mut app, mut line) = make_app();
    press(&mut app, &mut line);

    for v in [100.0, 900.0, 100.0, 900.0] {
        line.set_gate(Destination::B, v);
        line.set_rotary(310.0);
        line.advance(10_000);
        app.tick(&mut line).unwrap();
    }
    assert_eq!(app.state(), RunState::Paused);
    assert!(line.events.is_empty());
    assert_eq!(app.telemetry().edges_accepted, 0);
}

#[test]
fn resume_keeps_latches_and_restarts_liveness() {
    let (mut app, mut line) = make_app();
    line.set_rotary(50.0);
    tick(&mut app, &mut line);
    assert_eq!(app.telemetry().edges_accepted, 1);

    press(&mut app, &mut line);
    line.advance(60_000);
    press(&mut app, &mut line);

    // Arm still in band A: latched, so no new edge.
    line.set_rotary(50.0);
    tick(&mut app, &mut line);
    assert_eq!(app.telemetry().edges_accepted, 1);
    // Sixty idle seconds while paused did not count toward the timeout.
    assert_eq!(app.state(), RunState::Running);
}

#[test]
fn override_clears_a_fault() {
    let (mut app, mut line) = make_app();
    line.advance(u64::from(SystemConfig::default().liveness_wait_ms));
    app.tick(&mut line).unwrap();
    assert_eq!(app.state(), RunState::Faulted);

    press(&mut app, &mut line);
    assert_eq!(app.state(), RunState::Running);
    assert_eq!(line.last_status(), Some((StatusKind::Active, "")));

    tick(&mut app, &mut line);
    assert_eq!(app.state(), RunState::Running);
}

// ── Degraded collaborators ────────────────────────────────────

#[test]
fn sink_outage_is_counted_not_fatal() {
    let (mut app, mut line) = make_app();
    line.sink_down = true;

    line.set_gate(Destination::A, 600.0);
    tick(&mut app, &mut line);
    line.set_gate(Destination::A, 200.0);
    tick(&mut app, &mut line);
    press(&mut app, &mut line);

    assert_eq!(app.state(), RunState::Paused);
    let t = app.telemetry();
    assert_eq!(t.events, [1, 0]);
    assert_eq!(t.sink_failures, 2);

    line.sink_down = false;
    press(&mut app, &mut line);
    assert_eq!(line.last_status(), Some((StatusKind::Active, "")));
}

#[test]
fn display_failure_is_returned() {
    let (mut app, mut line) = make_app();
    line.display_down = true;

    let err = app
        .handle_command(AppCommand::ManualOverride, &mut line)
        .unwrap_err();
    assert_eq!(err, Error::Display(DisplayError::TextBus));
    // The transition itself happened and was reported.
    assert_eq!(app.state(), RunState::Paused);
    assert_eq!(line.last_status(), Some((StatusKind::Inactive, "")));
}

#[test]
fn display_catches_up_after_a_failed_write() {
    let (mut app, mut line) = make_app();
    line.display_down = true;
    assert!(
        app.handle_command(AppCommand::ManualOverride, &mut line)
            .is_err()
    );
    assert_eq!(line.screen(), Some((TEXT_WAITING, Indicator::Neutral)));

    // Still down: every tick retries and reports the failure.
    assert_eq!(
        app.tick(&mut line),
        Err(Error::Display(DisplayError::TextBus))
    );

    line.display_down = false;
    tick(&mut app, &mut line);
    assert_eq!(app.state(), RunState::Paused);
    assert_eq!(line.screen(), Some((TEXT_PAUSED, Indicator::Neutral)));

    // Written once, then left alone.
    let shown = line.screens.len();
    for _ in 0..10 {
        tick(&mut app, &mut line);
    }
    assert_eq!(line.screens.len(), shown);
}

#[test]
fn latest_screen_wins_after_an_outage() {
    let (mut app, mut line) = make_app();
    line.advance(u64::from(SystemConfig::default().liveness_wait_ms));
    line.display_down = true;
    assert!(app.tick(&mut line).is_err());
    assert_eq!(app.state(), RunState::Faulted);

    // Cleared while the panel is still dark; the red Timeout never shows.
    assert!(
        app.handle_command(AppCommand::ManualOverride, &mut line)
            .is_err()
    );
    line.display_down = false;
    tick(&mut app, &mut line);
    assert_eq!(app.state(), RunState::Running);
    assert_eq!(line.screen(), Some((TEXT_RUNNING, Indicator::Neutral)));
}

#[test]
fn ticks_without_display_change_tolerate_a_dead_display() {
    let (mut app, mut line) = make_app();
    line.display_down = true;
    for _ in 0..4 {
        tick(&mut app, &mut line);
    }
    assert_eq!(app.tick_count(), 4);
}

// ── Runtime configuration ─────────────────────────────────────

#[test]
fn config_update_moves_thresholds() {
    let (mut app, mut line) = make_app();
    let mut cfg = SystemConfig::default();
    cfg.rotary_low_deg = 40.0;
    app.handle_command(AppCommand::UpdateConfig(cfg.clone()), &mut line)
        .unwrap();
    assert_eq!(app.current_config(), cfg);

    line.set_rotary(50.0);
    tick(&mut app, &mut line);
    assert_eq!(app.telemetry().edges_accepted, 0);

    line.set_rotary(30.0);
    tick(&mut app, &mut line);
    assert_eq!(app.telemetry().edges_accepted, 1);
}

#[test]
fn invalid_config_update_is_rejected() {
    let (mut app, mut line) = make_app();
    let mut cfg = SystemConfig::default();
    cfg.rotary_low_deg = 300.0;

    let err = app
        .handle_command(AppCommand::UpdateConfig(cfg), &mut line)
        .unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ValidationFailed(_))));
    assert_eq!(app.current_config(), SystemConfig::default());
}

#[test]
fn relabelled_destination_reaches_the_sink() {
    let (mut app, mut line) = make_app();
    let mut cfg = SystemConfig::default();
    cfg.destination_b_label = linewatch::config::label("Outlet 2");
    app.handle_command(AppCommand::UpdateConfig(cfg), &mut line)
        .unwrap();

    line.set_gate(Destination::B, 600.0);
    tick(&mut app, &mut line);
    line.set_gate(Destination::B, 100.0);
    tick(&mut app, &mut line);
    assert_eq!(line.events[0].1, "Outlet 2");
}
