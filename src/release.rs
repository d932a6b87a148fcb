//! One-shot release actuator latch.
//!
//! Grounded on `safety::stop::SafeStopExecutor`'s phase state machine,
//! narrowed from its multi-phase deceleration sequence to a two-state
//! one-shot latch: the instrument boots `Locked` and may transition to
//! `Released` exactly once per power cycle.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseState {
    Locked,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The actuator was just commanded to release.
    Fired,
    /// Already released; no actuator command was issued.
    AlreadyReleased,
}

/// Tracks the release actuator's one-shot state. `release()` is the only
/// transition; everything else (lock attempts, repeated release/wiggle
/// requests) is an idempotent no-op against the current state.
#[derive(Debug, Clone, Copy)]
pub struct ReleaseLatch {
    state: ReleaseState,
}

impl ReleaseLatch {
    pub fn new() -> Self {
        ReleaseLatch {
            state: ReleaseState::Locked,
        }
    }

    pub fn state(&self) -> ReleaseState {
        self.state
    }

    pub fn released(&self) -> bool {
        self.state == ReleaseState::Released
    }

    /// Commands the actuator to release. Transitions `Locked` ->
    /// `Released` exactly once; any call after the first is a no-op that
    /// reports [`ReleaseOutcome::AlreadyReleased`] and must not re-fire
    /// the actuator.
    pub fn release(&mut self) -> ReleaseOutcome {
        match self.state {
            ReleaseState::Locked => {
                self.state = ReleaseState::Released;
                ReleaseOutcome::Fired
            }
            ReleaseState::Released => ReleaseOutcome::AlreadyReleased,
        }
    }

    /// Diagnostic wiggle: pulses the actuator without ever setting the
    /// latch. Callers are expected to only invoke this on the ground,
    /// before launch; the latch itself places no restriction on when,
    /// since it never observes the pulse.
    pub fn wiggle_is_safe(&self) -> bool {
        !self.released()
    }
}

impl Default for ReleaseLatch {
    fn default() -> Self {
        Self::new()
    }
}
