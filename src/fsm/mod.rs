//! Run-state machine for one dispensing line.
//!
//! Three states, each a row of plain `fn` pointers in a fixed table (see
//! [`states::build_state_table`]).  A tick runs the current row's `update`;
//! if that names another state, the engine runs the old row's `exit` and
//! the new row's `enter`.  Overrides and a failed start use
//! [`Fsm::force_transition`] to the same effect.
//!
//! Handlers never touch a port.  They read samples and write requests on
//! the shared [`FsmContext`], which the service applies afterwards.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;

/// Controller run state.  The discriminant indexes the state table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RunState {
    Running = 0,
    Paused = 1,
    Faulted = 2,
}

impl RunState {
    pub const COUNT: usize = 3;
}

/// Entry and exit hooks.
pub type StateActionFn = fn(&mut FsmContext);

/// Per-tick handler: `Some(next)` to transition, `None` to stay.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<RunState>;

/// Handlers for one state.
pub struct StateDescriptor {
    pub enter: StateActionFn,
    pub exit: Option<StateActionFn>,
    pub update: StateUpdateFn,
}

pub struct Fsm {
    table: [StateDescriptor; RunState::COUNT],
    current: RunState,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; RunState::COUNT], initial: RunState) -> Self {
        Self {
            table,
            current: initial,
        }
    }

    /// Run `enter` for the initial state.  Call once, before any tick.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in {:?}", self.current);
        (self.row(self.current).enter)(ctx);
        ctx.booting = false;
    }

    /// One control tick.
    pub fn tick(&mut self, ctx: &mut FsmContext) {
        ctx.total_ticks += 1;
        if let Some(next) = (self.row(self.current).update)(ctx) {
            self.switch_to(next, ctx);
        }
    }

    /// Transition requested from outside a tick.  A no-op if already there.
    pub fn force_transition(&mut self, next: RunState, ctx: &mut FsmContext) {
        if next != self.current {
            self.switch_to(next, ctx);
        }
    }

    pub fn current_state(&self) -> RunState {
        self.current
    }

    fn row(&self, state: RunState) -> &StateDescriptor {
        &self.table[state as usize]
    }

    fn switch_to(&mut self, next: RunState, ctx: &mut FsmContext) {
        info!("FSM transition: {:?} -> {:?}", self.current, next);
        if let Some(exit) = self.row(self.current).exit {
            exit(ctx);
        }
        self.current = next;
        (self.row(next).enter)(ctx);
    }
}
