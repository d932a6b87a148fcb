//! Launch detection: independent altitude/pressure baselines plus a
//! persistence counter, one-shot latch.
//!
//! Grounded on `state::machine::MachineStateMachine`'s latch-with-guard
//! idiom and `safety::flags::evaluate_axis_safety`'s baseline/threshold
//! comparison shape.

use crate::readings::Readings;
use crate::types::VariableId;

const ALT_DELTA_M: f32 = 30.0;
const PRESSURE_DELTA_HPA: f32 = 5.0;
const PERSISTENCE_TICKS: u8 = 5;

/// Result of feeding one tick into the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchUpdate {
    pub just_latched: bool,
}

/// Detects launch from an altitude or pressure excursion from an
/// independently-captured baseline, persisted for [`PERSISTENCE_TICKS`]
/// consecutive ticks. Disabled (frozen, non-accruing) while any Critical
/// error is active.
#[derive(Debug, Clone, Default)]
pub struct LaunchDetector {
    base_alt_m: Option<f32>,
    base_pressure_hpa: Option<f32>,
    candidate_ticks: u8,
    latched: bool,
}

impl LaunchDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latched(&self) -> bool {
        self.latched
    }

    /// Advances the detector by one tick. A no-op once latched.
    pub fn update(&mut self, readings: &Readings, any_critical: bool) -> LaunchUpdate {
        if self.latched {
            return LaunchUpdate { just_latched: false };
        }
        if any_critical {
            self.candidate_ticks = 0;
            return LaunchUpdate { just_latched: false };
        }

        let alt = readings.get(VariableId::GpsAltM);
        if self.base_alt_m.is_none() && alt.usable() {
            self.base_alt_m = Some(alt.value);
        }
        let pressure = readings.get(VariableId::PressureHpa);
        if self.base_pressure_hpa.is_none() && pressure.usable() {
            self.base_pressure_hpa = Some(pressure.value);
        }

        let alt_candidate = match (self.base_alt_m, alt.usable()) {
            (Some(base), true) => alt.value - base >= ALT_DELTA_M,
            _ => false,
        };
        let pressure_candidate = match (self.base_pressure_hpa, pressure.usable()) {
            (Some(base), true) => base - pressure.value >= PRESSURE_DELTA_HPA,
            _ => false,
        };

        if alt_candidate || pressure_candidate {
            self.candidate_ticks = self.candidate_ticks.saturating_add(1);
        } else {
            self.candidate_ticks = 0;
        }

        if self.candidate_ticks >= PERSISTENCE_TICKS {
            self.latched = true;
            return LaunchUpdate { just_latched: true };
        }
        LaunchUpdate { just_latched: false }
    }
}
