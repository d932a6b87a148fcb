//! Per-tick, validity-tagged sensor and external-input snapshot.

use crate::config::ExternalInputConfig;
use crate::types::VariableId;

/// One sampled variable: its value and whether the driver reported it
/// valid this tick. Time-domain variables ([`VariableId::is_time_domain`])
/// are always valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sample {
    pub value: f32,
    pub valid: bool,
}

impl Sample {
    /// A sample is usable by the rule engine only if marked valid *and*
    /// the value itself is finite (not NaN/inf from a misbehaving driver).
    pub fn usable(&self) -> bool {
        self.valid && self.value.is_finite()
    }
}

/// Cap on [`ExternalInputState::active_accum_ms`]. Chosen well above any
/// realistic `debounce_ms` so the accumulator still faithfully reflects
/// "has been active at least this long" rather than rolling over.
const ACTIVE_ACCUM_CAP_MS: u32 = 60_000;

/// Debounced state of one discrete (opto-isolated) external input.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalInputState {
    pub raw_active: bool,
    pub debounced_active: bool,
    active_accum_ms: u32,
}

impl ExternalInputState {
    /// Tracks how long the input has been continuously active. While
    /// `raw_active`, adds this tick's duration to `active_accum_ms`
    /// (saturating at [`ACTIVE_ACCUM_CAP_MS`]); otherwise resets it to 0.
    /// `debounced_active` is simply whether the accumulator has reached
    /// `debounce_ms` — a short pulse never accrues enough to latch, while
    /// any sustained activation latches within one tick of crossing the
    /// threshold.
    pub fn update(&mut self, raw_active: bool, debounce_ms: u32, tick_ms: u32) {
        self.raw_active = raw_active;
        self.active_accum_ms = if raw_active {
            self.active_accum_ms
                .saturating_add(tick_ms)
                .min(ACTIVE_ACCUM_CAP_MS)
        } else {
            0
        };
        self.debounced_active = self.active_accum_ms >= debounce_ms;
    }
}

/// Full per-tick snapshot: one [`Sample`] per [`VariableId`] plus the two
/// discrete external inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Readings {
    pub vars: [Sample; VariableId::COUNT],
    pub inputs: [ExternalInputState; 2],
}

static_assertions::const_assert_eq!(VariableId::COUNT, 9);

impl Readings {
    pub fn get(&self, id: VariableId) -> Sample {
        self.vars[id.index()]
    }

    pub fn set(&mut self, id: VariableId, sample: Sample) {
        self.vars[id.index()] = sample;
    }

    /// `true` once the GPS has reported a fix (`GpsFix` usable and != 0).
    pub fn gps_fix_present(&self) -> bool {
        let s = self.get(VariableId::GpsFix);
        s.usable() && s.value != 0.0
    }

    /// Runs external-input debounce for both channels against their
    /// configuration. `raw` is the driver-reported active level for each
    /// channel this tick.
    pub fn debounce_inputs(
        &mut self,
        raw: [bool; 2],
        configs: &[ExternalInputConfig; 2],
        tick_ms: u32,
    ) {
        for i in 0..2 {
            self.inputs[i].update(raw[i], configs[i].debounce_ms, tick_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_rejects_non_finite_even_if_marked_valid() {
        let s = Sample {
            value: f32::NAN,
            valid: true,
        };
        assert!(!s.usable());
    }

    #[test]
    fn external_input_debounces_over_threshold() {
        let mut st = ExternalInputState::default();
        st.update(true, 3000, 1000);
        assert!(!st.debounced_active);
        st.update(true, 3000, 1000);
        assert!(!st.debounced_active);
        st.update(true, 3000, 1000);
        assert!(st.debounced_active);
    }

    #[test]
    fn external_input_resets_accum_on_deactivation() {
        let mut st = ExternalInputState::default();
        st.update(true, 3000, 1000);
        st.update(false, 3000, 1000);
        assert!(!st.debounced_active);
        st.update(true, 3000, 1000);
        st.update(true, 3000, 1000);
        assert!(!st.debounced_active, "accumulator restarted after the drop");
    }

    #[test]
    fn external_input_short_pulse_never_latches() {
        let mut st = ExternalInputState::default();
        st.update(true, 3000, 1000);
        st.update(false, 3000, 1000);
        assert!(!st.debounced_active);
    }

    #[test]
    fn external_input_active_accum_saturates_at_cap() {
        let mut st = ExternalInputState::default();
        for _ in 0..100 {
            st.update(true, 3000, 1000);
        }
        assert!(st.debounced_active);
        st.update(false, 3000, 1000);
        assert!(!st.debounced_active, "deactivation clears the accumulator immediately");
    }

    #[test]
    fn gps_fix_present_requires_nonzero_usable_value() {
        let mut r = Readings::default();
        assert!(!r.gps_fix_present());
        r.set(
            VariableId::GpsFix,
            Sample {
                value: 1.0,
                valid: true,
            },
        );
        assert!(r.gps_fix_present());
    }
}
