//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!            ┌────[override]────┐
//!            ▼                  │
//!  ──▶ RUNNING ──[override]──▶ PAUSED
//!         │  ▲
//!  [no edge  │
//!   within   [override]
//!    wait]   │
//!         ▼  │
//!        FAULTED
//! ```
//!
//! Overrides arrive through the service as forced transitions; the only
//! transition an `update` handler returns is the liveness timeout.

use super::context::{FaultReason, FsmContext};
use super::{RunState, StateDescriptor};
use crate::app::events::{Destination, Indicator, StatusKind};
use log::{debug, info, warn};

/// Status message written once at start-up.
pub const MSG_STARTED: &str = "Machine started: wait activation";
/// Status message written on a liveness timeout.
pub const MSG_TIMEOUT: &str = "Timeout: no dispensing activity";

pub const TEXT_WAITING: &str = "Waiting...";
pub const TEXT_RUNNING: &str = "In production...";
pub const TEXT_PAUSED: &str = "In idle...";
pub const TEXT_TIMEOUT: &str = "Timeout";

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the state table, indexed by `RunState as usize`.
pub fn build_state_table() -> [StateDescriptor; RunState::COUNT] {
    [
        StateDescriptor {
            enter: running_enter,
            exit: None,
            update: running_update,
        },
        StateDescriptor {
            enter: paused_enter,
            exit: None,
            update: idle_update,
        },
        StateDescriptor {
            enter: faulted_enter,
            exit: Some(faulted_exit),
            update: idle_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING
// ═══════════════════════════════════════════════════════════════════════════

fn running_enter(ctx: &mut FsmContext) {
    // Resume restarts the liveness window; detector latches stay as they were.
    ctx.liveness.reset(ctx.now_ms);

    if ctx.booting {
        ctx.report(StatusKind::Active, MSG_STARTED);
        ctx.show(TEXT_WAITING, Indicator::Neutral);
        info!("RUNNING: waiting for first activation");
    } else {
        ctx.report(StatusKind::Active, "");
        ctx.show(TEXT_RUNNING, Indicator::Neutral);
        info!("RUNNING: detection resumed");
    }
}

fn running_update(ctx: &mut FsmContext) -> Option<RunState> {
    if ctx.liveness.expired(ctx.now_ms, ctx.config.liveness_wait()) {
        warn!(
            "No directional edge for {:?}, faulting",
            ctx.liveness.elapsed_since(ctx.now_ms)
        );
        ctx.fault = Some(FaultReason::LivenessTimeout);
        return Some(RunState::Faulted);
    }

    let rotary = ctx.samples.rotary;
    if let Some(direction) = ctx.edge.evaluate(&rotary) {
        ctx.liveness.reset(ctx.now_ms);
        ctx.edges_accepted += 1;
        info!("Arm turned toward {} ({:.0}°)", direction, rotary.value);
    }

    for destination in Destination::ALL {
        let sample = *ctx.samples.gate(destination);
        if ctx.gates[destination.index()].evaluate(&sample).is_some() {
            debug!("Gate {} tripped at {:.0}", destination, sample.value);
            ctx.passed(destination);
        }
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  PAUSED
// ═══════════════════════════════════════════════════════════════════════════

fn paused_enter(ctx: &mut FsmContext) {
    ctx.report(StatusKind::Inactive, "");
    ctx.show(TEXT_PAUSED, Indicator::Neutral);
    info!("PAUSED: detection suspended");
}

/// Paused and Faulted wait for an override; nothing to do per tick.
fn idle_update(_ctx: &mut FsmContext) -> Option<RunState> {
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  FAULTED
// ═══════════════════════════════════════════════════════════════════════════

fn faulted_enter(ctx: &mut FsmContext) {
    match ctx.fault.clone() {
        Some(FaultReason::Init(text)) => {
            ctx.report(StatusKind::Error, &text);
            ctx.show(&text, Indicator::Alert);
            warn!("FAULTED: start-up failed: {}", text);
        }
        Some(FaultReason::LivenessTimeout) | None => {
            ctx.report(StatusKind::Error, MSG_TIMEOUT);
            ctx.show(TEXT_TIMEOUT, Indicator::Alert);
            warn!("FAULTED: liveness timeout, waiting for override");
        }
    }
}

fn faulted_exit(ctx: &mut FsmContext) {
    if let Some(reason) = ctx.fault.take() {
        info!("Fault cleared: {:?}", reason);
    }
}
