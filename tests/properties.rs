use approx::assert_abs_diff_eq;
use proptest::prelude::*;

use cluster_gauge::motion::{MotionSimulator, Physics, SETTLE_THRESHOLD};
use cluster_gauge::{value_to_angle, GaugeConfig};

fn config(min: f64, span: f64, start: f64, sweep: f64) -> GaugeConfig {
    GaugeConfig::builder()
        .min(min)
        .max(min + span)
        .start_angle(start)
        .end_angle(start + sweep)
        .build()
}

fn physics(stiffness: f64, damping: f64) -> Physics {
    Physics {
        stiffness,
        damping,
        ..Physics::default()
    }
}

proptest! {
    #[test]
    fn angles_stay_inside_the_sweep(
        min in -1000.0f64..1000.0,
        span in 0.001f64..1000.0,
        start in -360.0f64..360.0,
        sweep in -360.0f64..360.0,
        t in 0.0f64..=1.0,
    ) {
        let config = config(min, span, start, sweep);
        let angle = value_to_angle(&config, min + span * t);
        let a = (start - 90.0).to_radians();
        let b = (start + sweep - 90.0).to_radians();
        prop_assert!(angle >= a.min(b) - 1e-9 && angle <= a.max(b) + 1e-9);
    }

    #[test]
    fn angles_are_monotonic_for_clockwise_sweeps(
        min in -1000.0f64..1000.0,
        span in 0.001f64..1000.0,
        start in -360.0f64..360.0,
        sweep in 0.1f64..360.0,
        t1 in 0.0f64..=1.0,
        t2 in 0.0f64..=1.0,
    ) {
        let config = config(min, span, start, sweep);
        let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
        prop_assert!(value_to_angle(&config, min + span * lo) <= value_to_angle(&config, min + span * hi));
    }

    #[test]
    fn endpoints_are_exact(
        min in -1000.0f64..1000.0,
        span in 0.001f64..1000.0,
        start in -360.0f64..360.0,
        sweep in -360.0f64..360.0,
    ) {
        let config = config(min, span, start, sweep);
        prop_assert_eq!(value_to_angle(&config, config.min), (start - 90.0).to_radians());
        prop_assert_eq!(value_to_angle(&config, config.max), (start + sweep - 90.0).to_radians());
    }

    #[test]
    fn degenerate_range_is_a_finite_constant(
        bound in -1000.0f64..1000.0,
        value in proptest::num::f64::ANY,
    ) {
        let config = GaugeConfig::builder().min(bound).max(bound).build();
        let angle = value_to_angle(&config, value);
        prop_assert!(angle.is_finite());
        prop_assert_eq!(angle, value_to_angle(&config, bound));
    }

    #[test]
    fn immediate_targets_are_idempotent(
        target in -6.0f64..6.0,
        t in 0.0f64..1.0e6,
        calls in 1usize..20,
    ) {
        let mut sim = MotionSimulator::new(0.0, Physics::default());
        sim.set_target(target, true);
        for _ in 0..calls {
            prop_assert_eq!(sim.advance(t), target);
        }
    }

    #[test]
    fn constant_targets_settle_and_stay_settled(
        stiffness in 50.0f64..400.0,
        damping in 5.0f64..60.0,
        target in -3.0f64..3.0,
    ) {
        let mut sim = MotionSimulator::new(0.0, physics(stiffness, damping));
        sim.set_target(target, false);
        let mut t = 0.0;
        sim.advance(t);
        for _ in 0..300 {
            t += 100.0;
            sim.advance(t);
        }
        prop_assert!(sim.is_settled(SETTLE_THRESHOLD));
        for _ in 0..100 {
            t += 16.0;
            sim.advance(t);
            prop_assert!(sim.is_settled(SETTLE_THRESHOLD));
        }
    }

    #[test]
    fn motion_is_independent_of_call_rate(
        stiffness in 10.0f64..400.0,
        damping in 1.0f64..60.0,
        target in -3.0f64..3.0,
    ) {
        let mut coarse = MotionSimulator::new(0.0, physics(stiffness, damping));
        let mut fine = coarse.clone();
        for sim in [&mut coarse, &mut fine] {
            sim.set_target(target, false);
            sim.advance(0.0);
        }
        for i in 1..=10 {
            coarse.advance(i as f64 * 100.0);
        }
        for i in 1..=60 {
            fine.advance(i as f64 * 1000.0 / 60.0);
        }
        assert_abs_diff_eq!(coarse.angle(), fine.angle(), epsilon = 1e-9);
    }
}
