//! Lateral properties over long tick sequences.

use actuation_common::controller::flags::InputFlags;
use actuation_common::controller::intent::ActuatorIntent;
use actuation_common::controller::snapshot::VehicleStateSnapshot;
use actuation_common::controller::state::WindDownPhase;

use super::{SONATA_LIMITS, WIDE_LIMITS, session};

/// Deterministic pseudo-random sequence (xorshift).
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn unit(&mut self) -> f64 {
        (self.next() % 20_001) as f64 / 10_000.0 - 1.0
    }
}

#[test]
fn step_and_magnitude_bounded_for_arbitrary_requests() {
    let mut handle = session("model = \"HYUNDAI_SONATA\"", WIDE_LIMITS);
    let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
    let mut last = 0i32;

    for tick in 0..5_000u64 {
        let intent = ActuatorIntent {
            lat_active: tick % 700 < 600,
            // Includes requests far outside [-1, 1].
            steer: rng.unit() * 3.0,
            ..Default::default()
        };
        let snapshot = VehicleStateSnapshot {
            steering_torque: (rng.next() % 401) as i32 - 200,
            steering_pressed: rng.next() % 50 == 0,
            ..Default::default()
        };
        let out = handle.tick(&intent, &snapshot);
        let applied = out.state.last_applied_steer;

        assert!(applied.abs() <= 1000, "tick {tick}: |{applied}| > steer_max");
        // A driver override may cut to zero outright; every other step is rate limited.
        if applied != 0 {
            assert!((applied - last).abs() <= 25, "tick {tick}: step {last} -> {applied}");
        }
        assert!(!out.flags.contains(InputFlags::STALE_FEEDBACK));
        last = applied;
    }
}

#[test]
fn wind_down_from_500_ramps_to_zero() {
    let mut handle = session("model = \"HYUNDAI_SONATA\"", WIDE_LIMITS);
    let active = ActuatorIntent {
        lat_active: true,
        steer: 0.5,
        ..Default::default()
    };
    let snapshot = VehicleStateSnapshot::default();

    // 10 per tick up to 500.
    for _ in 0..50 {
        handle.tick(&active, &snapshot);
    }
    assert_eq!(handle.state().last_applied_steer, 500);

    let released = ActuatorIntent::default();
    let expected_ticks = 500_u32.div_ceil(25);
    let mut previous = 500;
    let mut ticks = 0_u32;
    loop {
        let out = handle.tick(&released, &snapshot);
        ticks += 1;
        let applied = out.state.last_applied_steer;
        assert!(applied >= 0, "sign reversal");
        assert!(applied < previous, "not strictly decreasing");

        let toi_flt = out.messages[0].signal("CF_Lkas_ToiFlt");
        if applied == 0 {
            assert_eq!(out.state.wind_down, WindDownPhase::Idle);
            assert_eq!(toi_flt, Some(0.0));
            break;
        }
        assert_eq!(out.state.wind_down, WindDownPhase::WindingDown);
        assert_eq!(toi_flt, Some(1.0));
        previous = applied;
    }
    assert_eq!(ticks, expected_ticks);
}

#[test]
fn reengage_during_wind_down_resumes_from_current_value() {
    let mut handle = session("model = \"HYUNDAI_SONATA\"", WIDE_LIMITS);
    let active = ActuatorIntent {
        lat_active: true,
        steer: 0.3,
        ..Default::default()
    };
    let snapshot = VehicleStateSnapshot::default();
    for _ in 0..30 {
        handle.tick(&active, &snapshot);
    }
    handle.tick(&ActuatorIntent::default(), &snapshot);
    handle.tick(&ActuatorIntent::default(), &snapshot);
    assert_eq!(handle.state().last_applied_steer, 300 - 50);

    let out = handle.tick(&active, &snapshot);
    assert_eq!(out.state.wind_down, WindDownPhase::Active);
    assert_eq!(out.state.last_applied_steer, 260);
}

#[test]
fn high_torque_variant_caps_fraction() {
    let mut handle = session("model = \"HYUNDAI_KONA\"", WIDE_LIMITS);
    let full = ActuatorIntent {
        lat_active: true,
        steer: 1.0,
        ..Default::default()
    };
    let mut out = handle.tick(&full, &VehicleStateSnapshot::default());
    assert!(out.flags.contains(InputFlags::STEER_CLAMPED));
    for _ in 0..200 {
        out = handle.tick(&full, &VehicleStateSnapshot::default());
    }
    assert_eq!(out.state.last_applied_steer, 700);
    assert!((out.applied.steer - 0.7).abs() < 1e-12);
}

#[test]
fn opposing_driver_slows_growth() {
    let mut free = session("model = \"HYUNDAI_SONATA\"", SONATA_LIMITS);
    let mut fought = session("model = \"HYUNDAI_SONATA\"", SONATA_LIMITS);
    let left = ActuatorIntent {
        lat_active: true,
        steer: -0.8,
        ..Default::default()
    };
    let driver_right = VehicleStateSnapshot {
        steering_torque: 200,
        ..Default::default()
    };

    for _ in 0..40 {
        let a = free.tick(&left, &VehicleStateSnapshot::default()).state.last_applied_steer;
        let b = fought.tick(&left, &driver_right).state.last_applied_steer;
        assert!(b.abs() <= a.abs(), "opposed {b} grew past free {a}");
    }
    // Sonata rates are up 3 / down 7: opposed growth is held to 3 per tick.
    assert_eq!(fought.state().last_applied_steer, -120);
    assert_eq!(free.state().last_applied_steer, -120);
}
