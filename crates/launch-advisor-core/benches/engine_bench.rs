use criterion::{criterion_group, criterion_main, Criterion};
use launch_advisor_core::{
    evaluate, evaluate_with_variant, LaunchSnapshot, MainEngineStatus, RuleSetVariant,
    SubsystemStatus, WeatherState,
};

fn nominal_snapshot() -> LaunchSnapshot {
    LaunchSnapshot {
        fuel_level: 100,
        main_engine: MainEngineStatus::Nominal,
        tank_pressure: SubsystemStatus::Ok,
        navigation: SubsystemStatus::Ok,
        communication: SubsystemStatus::Ok,
        electrical: SubsystemStatus::Ok,
        control_software: SubsystemStatus::Ok,
        precipitation_probability: 0,
        weather: WeatherState::Clear,
        sensors: SubsystemStatus::Ok,
        aerodynamics: SubsystemStatus::Ok,
    }
}

fn degraded_snapshot() -> LaunchSnapshot {
    LaunchSnapshot {
        fuel_level: 10,
        main_engine: MainEngineStatus::Anomaly,
        tank_pressure: SubsystemStatus::Fail,
        navigation: SubsystemStatus::Fail,
        communication: SubsystemStatus::Fail,
        electrical: SubsystemStatus::Fail,
        control_software: SubsystemStatus::Fail,
        precipitation_probability: 90,
        weather: WeatherState::Overcast,
        sensors: SubsystemStatus::Fail,
        aerodynamics: SubsystemStatus::Fail,
    }
}

fn bench_all_clear(c: &mut Criterion) {
    let snapshot = nominal_snapshot();

    c.bench_function("evaluate_all_clear", |b| {
        b.iter(|| {
            if let Err(err) = evaluate(snapshot) {
                panic!("all-clear benchmark evaluation failed: {err}");
            }
        });
    });
}

fn bench_worst_case(c: &mut Criterion) {
    let snapshot = degraded_snapshot();

    c.bench_function("evaluate_every_rule_firing", |b| {
        b.iter(|| {
            if let Err(err) = evaluate(snapshot) {
                panic!("worst-case benchmark evaluation failed: {err}");
            }
        });
    });
}

fn bench_baseline_variant(c: &mut Criterion) {
    let snapshot = degraded_snapshot();

    c.bench_function("evaluate_baseline_variant", |b| {
        b.iter(|| {
            if let Err(err) = evaluate_with_variant(snapshot, RuleSetVariant::Baseline) {
                panic!("baseline benchmark evaluation failed: {err}");
            }
        });
    });
}

criterion_group!(engine_benches, bench_all_clear, bench_worst_case, bench_baseline_variant);
criterion_main!(engine_benches);
