//! Benchmarks the per-tick cost of the bucket rule engine.
//!
//! Grounded on `evo_control_unit/benches/cycle_benchmark.rs`.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use heapless::Vec as HVec;

use cutdown_core::config::{Condition, MAX_CONDITIONS};
use cutdown_core::readings::{Readings, Sample};
use cutdown_core::rules::RuleEngine;
use cutdown_core::types::{ComparisonOp, VariableId};

fn full_bucket() -> HVec<Condition, MAX_CONDITIONS> {
    let mut v = HVec::new();
    for i in 0..MAX_CONDITIONS {
        let _ = v.push(Condition {
            enabled: true,
            var_id: VariableId::ALL[i % VariableId::COUNT],
            op: ComparisonOp::Ge,
            threshold: 10.0,
            for_seconds: 5,
        });
    }
    v
}

fn readings() -> Readings {
    let mut r = Readings::default();
    for id in VariableId::ALL {
        r.set(id, Sample { value: 11.0, valid: true });
    }
    r
}

fn bench_rule_engine(c: &mut Criterion) {
    let mut engine = RuleEngine::new(full_bucket(), full_bucket());
    let r = readings();
    c.bench_function("rule_engine_evaluate_full_buckets", |b| {
        b.iter(|| engine.evaluate(black_box(&r), black_box(true)))
    });
}

criterion_group!(benches, bench_rule_engine);
criterion_main!(benches);
