//! Flight termination detection: altitude/pressure descent tracked
//! against a running peak/min, confirmed by a sustain counter.
//!
//! Grounded on `safety::stop::SafeStopExecutor`'s cycle-counter-threshold
//! ("sustain") pattern.

use crate::config::TerminationConfig;
use crate::readings::Readings;
use crate::types::VariableId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminationUpdate {
    pub just_terminated: bool,
}

/// Tracks peak altitude and minimum pressure seen since launch and raises
/// termination once a drop/rise from those extremes has been sustained
/// for `sustain_s` consecutive ticks. A no-op while disabled by
/// configuration or once already terminated.
#[derive(Debug, Clone, Default)]
pub struct TerminationDetector {
    peak_alt_m: Option<f32>,
    min_pressure_hpa: Option<f32>,
    descent_ticks: u16,
    terminated: bool,
}

impl TerminationDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn terminated(&self) -> bool {
        self.terminated
    }

    /// Forces the latch to terminated regardless of the sustain counter.
    /// Used when a cut decision fires: a cut implies termination even if
    /// the descent was never independently confirmed.
    pub fn force_terminate(&mut self) {
        self.terminated = true;
    }

    pub fn peak_alt_m(&self) -> Option<f32> {
        self.peak_alt_m
    }

    pub fn min_pressure_hpa(&self) -> Option<f32> {
        self.min_pressure_hpa
    }

    pub fn descent_ticks(&self) -> u16 {
        self.descent_ticks
    }

    /// Advances the detector by one tick. Only meaningful once the flight
    /// is airborne; the caller is responsible for only invoking this
    /// while `FlightState::InFlight`.
    pub fn update(
        &mut self,
        readings: &Readings,
        config: &TerminationConfig,
        any_critical: bool,
    ) -> TerminationUpdate {
        if self.terminated || !config.enabled {
            return TerminationUpdate { just_terminated: false };
        }
        if any_critical {
            self.descent_ticks = 0;
            return TerminationUpdate { just_terminated: false };
        }

        let alt = readings.get(VariableId::GpsAltM);
        if alt.usable() {
            self.peak_alt_m = Some(self.peak_alt_m.map_or(alt.value, |p| p.max(alt.value)));
        }
        let pressure = readings.get(VariableId::PressureHpa);
        if pressure.usable() {
            self.min_pressure_hpa =
                Some(self.min_pressure_hpa.map_or(pressure.value, |m| m.min(pressure.value)));
        }

        let alt_candidate = match (self.peak_alt_m, alt.usable(), config.gps_drop_m) {
            (Some(peak), true, Some(drop)) => peak - alt.value >= drop,
            _ => false,
        };
        let pressure_candidate = match (self.min_pressure_hpa, pressure.usable(), config.pressure_rise_hpa)
        {
            (Some(min), true, Some(rise)) => pressure.value - min >= rise,
            _ => false,
        };

        if alt_candidate || pressure_candidate {
            self.descent_ticks = self.descent_ticks.saturating_add(1);
        } else {
            self.descent_ticks = 0;
        }

        if self.descent_ticks >= config.sustain_s {
            self.terminated = true;
            return TerminationUpdate { just_terminated: true };
        }
        TerminationUpdate { just_terminated: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readings::Sample;

    fn reading(alt: f32, pressure: f32) -> Readings {
        let mut r = Readings::default();
        r.set(VariableId::GpsAltM, Sample { value: alt, valid: true });
        r.set(VariableId::PressureHpa, Sample { value: pressure, valid: true });
        r
    }

    fn config() -> TerminationConfig {
        TerminationConfig {
            enabled: true,
            sustain_s: 3,
            gps_drop_m: Some(100.0),
            pressure_rise_hpa: Some(2.0),
        }
    }

    #[test]
    fn terminates_after_sustained_altitude_drop() {
        let cfg = config();
        let mut d = TerminationDetector::new();
        d.update(&reading(30000.0, 100.0), &cfg, false);
        for _ in 0..2 {
            let u = d.update(&reading(29800.0, 100.0), &cfg, false);
            assert!(!u.just_terminated);
        }
        let u = d.update(&reading(29800.0, 100.0), &cfg, false);
        assert!(u.just_terminated);
        assert!(d.terminated());
    }

    #[test]
    fn force_terminate_overrides_sustain_counter() {
        let mut d = TerminationDetector::new();
        assert!(!d.terminated());
        d.force_terminate();
        assert!(d.terminated());
    }

    #[test]
    fn disabled_config_never_terminates() {
        let mut cfg = config();
        cfg.enabled = false;
        let mut d = TerminationDetector::new();
        for _ in 0..10 {
            let u = d.update(&reading(1000.0, 500.0), &cfg, false);
            assert!(!u.just_terminated);
        }
    }

    #[test]
    fn resets_sustain_counter_on_recovery() {
        let cfg = config();
        let mut d = TerminationDetector::new();
        d.update(&reading(30000.0, 100.0), &cfg, false);
        d.update(&reading(29800.0, 100.0), &cfg, false);
        d.update(&reading(30000.0, 100.0), &cfg, false);
        for _ in 0..2 {
            let u = d.update(&reading(29800.0, 100.0), &cfg, false);
            assert!(!u.just_terminated);
        }
    }
}
