//! Bucket A (AND) / Bucket B (OR) cut-trigger rule engine with
//! per-condition integer dwell accumulators.
//!
//! Grounded on `safety::flags::evaluate_axis_safety`'s flag-aggregation
//! shape and `command::arbitration`'s declarative per-item evaluation.
//! Dwell accumulators are `u16` tick counts rather than float seconds: a
//! 1 Hz tick makes "ticks" and "seconds" the same unit without the
//! rounding hazards of repeated float addition.

use heapless::Vec as HVec;

use crate::config::{Condition, MAX_CONDITIONS};
use crate::readings::Readings;

/// Per-condition dwell state, parallel to a [`Condition`] list.
#[derive(Debug, Clone, Copy, Default)]
struct Dwell {
    accum_ticks: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleEvaluation {
    pub bucket_a: bool,
    pub bucket_b: bool,
}

/// Evaluates the two condition buckets each tick, tracking a dwell
/// accumulator per condition. Bucket A is satisfied only if every enabled
/// condition is (AND, vacuously true if none enabled); Bucket B is
/// satisfied if any enabled condition is (OR, vacuously false if none
/// enabled).
#[derive(Debug, Clone)]
pub struct RuleEngine {
    bucket_a: HVec<Condition, MAX_CONDITIONS>,
    bucket_b: HVec<Condition, MAX_CONDITIONS>,
    dwell_a: HVec<Dwell, MAX_CONDITIONS>,
    dwell_b: HVec<Dwell, MAX_CONDITIONS>,
}

impl RuleEngine {
    pub fn new(bucket_a: HVec<Condition, MAX_CONDITIONS>, bucket_b: HVec<Condition, MAX_CONDITIONS>) -> Self {
        let dwell_a = HVec::from_iter(bucket_a.iter().map(|_| Dwell::default()));
        let dwell_b = HVec::from_iter(bucket_b.iter().map(|_| Dwell::default()));
        RuleEngine {
            bucket_a,
            bucket_b,
            dwell_a,
            dwell_b,
        }
    }

    /// Advances all dwell accumulators by one tick and returns the
    /// bucket results. When `gates_pass` is false, every accumulator is
    /// reset to 0 this tick instead of evaluated normally: dwell may not
    /// accrue while gated.
    pub fn evaluate(&mut self, readings: &Readings, gates_pass: bool) -> RuleEvaluation {
        let bucket_a = Self::evaluate_bucket(&self.bucket_a, &mut self.dwell_a, readings, gates_pass, true);
        let bucket_b = Self::evaluate_bucket(&self.bucket_b, &mut self.dwell_b, readings, gates_pass, false);
        RuleEvaluation { bucket_a, bucket_b }
    }

    fn evaluate_bucket(
        conditions: &HVec<Condition, MAX_CONDITIONS>,
        dwell: &mut HVec<Dwell, MAX_CONDITIONS>,
        readings: &Readings,
        gates_pass: bool,
        and_semantics: bool,
    ) -> bool {
        let mut any_enabled = false;
        let mut result = and_semantics;
        for (cond, d) in conditions.iter().zip(dwell.iter_mut()) {
            if !cond.enabled {
                continue;
            }
            any_enabled = true;

            if !gates_pass {
                d.accum_ticks = 0;
            }

            let sample = readings.get(cond.var_id);
            let comparison_holds = sample.usable() && cond.op.evaluate(sample.value, cond.threshold);

            if gates_pass {
                d.accum_ticks = if comparison_holds {
                    d.accum_ticks.saturating_add(1).min(cond.for_seconds.saturating_add(1))
                } else {
                    0
                };
            }

            let satisfied =
                comparison_holds && (cond.for_seconds == 0 || d.accum_ticks >= cond.for_seconds);

            if and_semantics {
                result &= satisfied;
            } else {
                result |= satisfied;
            }
        }
        if !any_enabled {
            return and_semantics;
        }
        result
    }
}
