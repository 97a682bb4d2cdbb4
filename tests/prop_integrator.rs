//! Property-based tests for the field model, the integrator and the search.

use coax_sim::config::TimeStep;
use coax_sim::{CriticalVoltageSearch, FieldModel, Integrator, SimulationParameters};
use proptest::prelude::*;

fn params(inner: f64, gap: f64, speed: f64, length: f64) -> SimulationParameters {
    SimulationParameters::new(inner, inner + gap, speed, length)
        .and_then(|p| p.with_time_step(TimeStep::StepsPerTransit(200)))
        .expect("generated geometry is valid")
}

fn geometry() -> impl Strategy<Value = SimulationParameters> {
    (0.001f64..0.05, 0.001f64..0.05, 1e5f64..1e7, 0.01f64..0.5)
        .prop_map(|(inner, gap, speed, length)| params(inner, gap, speed, length))
}

// ── Field model ──────────────────────────────────────────────────────

proptest! {
    /// Acceleration grows with voltage at any radius inside the gap.
    #[test]
    fn acceleration_increases_with_voltage(
        p in geometry(),
        u1 in 0.0f64..100.0,
        du in 1e-3f64..100.0,
        frac in 0.0f64..1.0,
    ) {
        let field = FieldModel::new(&p).unwrap();
        let r = p.inner_radius + frac * p.gap();
        let a1 = field.acceleration(u1, r).unwrap();
        let a2 = field.acceleration(u1 + du, r).unwrap();
        prop_assert!(a2 > a1, "a({}) = {}, a({}) = {}", u1, a1, u1 + du, a2);
    }

    /// Closer to the axis the field is stronger.
    #[test]
    fn acceleration_decreases_with_radius(p in geometry(), u in 1e-3f64..100.0) {
        let field = FieldModel::new(&p).unwrap();
        let near = field.acceleration(u, p.inner_radius).unwrap();
        let far = field.acceleration(u, p.outer_radius).unwrap();
        prop_assert!(near > far);
    }
}

// ── Integrator ───────────────────────────────────────────────────────

proptest! {
    /// Identical inputs give bit-identical outputs.
    #[test]
    fn simulate_is_deterministic(p in geometry(), u in 0.0f64..10.0) {
        let integrator = Integrator::new(p).unwrap();
        let first = integrator.simulate(u).unwrap();
        let second = integrator.simulate(u).unwrap();
        prop_assert_eq!(first.to_bits(), second.to_bits());
    }

    /// With a non-negative voltage the particle never moves away from the inner wall.
    #[test]
    fn position_never_rises(p in geometry(), u in 0.0f64..10.0) {
        let integrator = Integrator::new(p).unwrap();
        let trajectory = integrator.record(u).unwrap();
        let pos = trajectory.positions();
        prop_assert!(!pos.is_empty());
        for w in pos.windows(2) {
            prop_assert!(w[1] <= w[0], "{} -> {}", w[0], w[1]);
        }
        let vy = trajectory.velocities();
        prop_assert!(vy.iter().all(|v| *v >= 0.0));
    }

    /// A lower voltage never ends closer to the wall than a higher one that transits.
    #[test]
    fn transit_is_monotonic_in_voltage(
        p in geometry(),
        low in 0.0f64..1.0,
        du in 0.0f64..1.0,
    ) {
        let integrator = Integrator::new(p).unwrap();
        let high_pos = integrator.simulate(low + du).unwrap();
        if high_pos > 0.0 {
            let low_pos = integrator.simulate(low).unwrap();
            prop_assert!(low_pos >= high_pos);
        }
    }
}

// ── Search ───────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// The reported voltage captures the particle and a slightly lower one does not.
    #[test]
    fn search_result_straddles_threshold(
        inner in 0.005f64..0.02,
        gap in 0.005f64..0.02,
        speed in 5e5f64..2e6,
    ) {
        let integrator = Integrator::new(params(inner, gap, speed, 0.1)).unwrap();
        let search = CriticalVoltageSearch::new(&integrator);
        let tol = search.config().tolerance;
        let v = search.find_minimum_voltage().unwrap();
        prop_assert!(integrator.simulate(v).unwrap() <= 0.0);
        prop_assert!(integrator.simulate((v - 2.0 * tol).max(0.0)).unwrap() > 0.0);
    }
}
