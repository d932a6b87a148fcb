//! Monotonic flight lifecycle state, recomputed every tick.
//!
//! Grounded directly on `state::machine::MachineStateMachine`'s
//! `handle_event`/`TransitionResult` shape, simplified from an
//! event-driven machine to a pure recompute since the flight lifecycle
//! has exactly two independent latches (launch, terminated) to fold in
//! each tick rather than a general event stream.

use crate::types::FlightState;

/// Result of recomputing the flight state for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionResult {
    pub state: FlightState,
    pub changed: bool,
}

/// Wraps [`FlightState`] with the monotonicity invariant: the state can
/// only move forward (`Ground` -> `InFlight` -> `Terminated`), never back,
/// even if the inputs that drove it later look inconsistent.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlightStateMachine {
    current: FlightState,
}

impl FlightStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> FlightState {
        self.current
    }

    /// Recomputes the flight state from the two one-shot latches. Takes
    /// the max of the current and newly-derived state so a transient
    /// inconsistency (e.g. `terminated` true while `launch_detected` is
    /// somehow still false) can never regress an already-advanced state.
    pub fn update(&mut self, launch_detected: bool, terminated: bool) -> TransitionResult {
        let derived = if terminated {
            FlightState::Terminated
        } else if launch_detected {
            FlightState::InFlight
        } else {
            FlightState::Ground
        };
        let next = if derived.as_u8() > self.current.as_u8() {
            derived
        } else {
            self.current
        };
        let changed = next != self.current;
        self.current = next;
        TransitionResult {
            state: next,
            changed,
        }
    }
}
