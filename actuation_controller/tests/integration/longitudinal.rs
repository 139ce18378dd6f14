//! Accel command group behaviour over many ticks.

use actuation_common::controller::intent::{ActuatorIntent, LongControlState};
use actuation_common::controller::message::{FrameKind, OutboundMessage};
use actuation_common::controller::snapshot::VehicleStateSnapshot;
use actuation_controller::cycle::TickOutput;

use super::{SONATA_LIMITS, session};

const OWN_LONG: &str = "model = \"HYUNDAI_SONATA\"\nown_longitudinal = true";

fn find(out: &TickOutput, kind: FrameKind) -> Option<&OutboundMessage> {
    out.messages.iter().find(|m| m.kind == kind)
}

fn long_intent(accel: f64) -> ActuatorIntent {
    ActuatorIntent {
        enabled: true,
        long_active: true,
        accel,
        long_control_state: LongControlState::Pid,
        ..Default::default()
    }
}

#[test]
fn accel_group_only_on_even_frames_in_order() {
    let mut handle = session(OWN_LONG, SONATA_LIMITS);
    for frame in 0..40u64 {
        let out = handle.tick(&long_intent(0.5), &VehicleStateSnapshot::default());
        let group: Vec<FrameKind> = out
            .messages
            .iter()
            .map(|m| m.kind)
            .filter(|k| matches!(k, FrameKind::Scc11 | FrameKind::Scc12 | FrameKind::Scc14))
            .collect();
        if frame % 2 == 0 {
            assert_eq!(group, vec![FrameKind::Scc11, FrameKind::Scc12, FrameKind::Scc14]);
        } else {
            assert!(group.is_empty(), "frame {frame}");
        }
    }
}

#[test]
fn jerk_bounds_follow_accel_error() {
    let mut handle = session(OWN_LONG, SONATA_LIMITS);
    let snapshot = VehicleStateSnapshot {
        speed: 10.0,
        accel: 0.1,
        ..Default::default()
    };
    let out = handle.tick(&long_intent(0.5), &snapshot);
    let scc14 = find(&out, FrameKind::Scc14).unwrap();
    let upper = scc14.signal("JerkUpperLimit").unwrap();
    assert!((upper - 0.8).abs() < 1e-9, "upper {upper}");
    assert_eq!(scc14.signal("JerkLowerLimit"), Some(12.7));

    // Large error saturates the upper bound.
    let out = handle.tick(&long_intent(0.5), &snapshot);
    assert!(find(&out, FrameKind::Scc14).is_none());
    let out = handle.tick(&long_intent(2.0), &snapshot);
    assert_eq!(find(&out, FrameKind::Scc14).unwrap().signal("JerkUpperLimit"), Some(2.0));
}

#[test]
fn stopped_under_hold_releases_after_hold_time() {
    let mut handle = session(OWN_LONG, SONATA_LIMITS);
    let held = VehicleStateSnapshot {
        speed: 0.0,
        brake_control_active: true,
        ..Default::default()
    };

    let mut release_frame = None;
    for frame in 0..80u64 {
        let out = handle.tick(&long_intent(0.5), &held);
        let Some(scc12) = find(&out, FrameKind::Scc12) else {
            continue;
        };
        let accel = scc12.signal("aReqValue").unwrap();
        if accel == 1.0 {
            release_frame.get_or_insert(frame);
            assert_eq!(find(&out, FrameKind::Scc14).unwrap().signal("JerkUpperLimit"), Some(1.0));
        } else {
            assert_eq!(accel, 0.5);
        }
    }
    // 25 evaluations at 50 Hz: the 25th lands on frame 48.
    assert_eq!(release_frame, Some(48));
}

#[test]
fn moving_resets_stop_timer() {
    let mut handle = session(OWN_LONG, SONATA_LIMITS);
    let held = VehicleStateSnapshot {
        speed: 0.0,
        brake_control_active: true,
        ..Default::default()
    };
    for _ in 0..40 {
        handle.tick(&long_intent(0.5), &held);
    }
    assert!(handle.state().stop_timer > 0.0);
    handle.tick(&long_intent(0.5), &VehicleStateSnapshot { speed: 3.0, ..held });
    assert_eq!(handle.state().stop_timer, 0.0);
}

#[test]
fn accel_clamped_to_configured_range() {
    let mut handle = session(OWN_LONG, SONATA_LIMITS);
    let out = handle.tick(&long_intent(-9.0), &VehicleStateSnapshot { speed: 20.0, ..Default::default() });
    assert_eq!(find(&out, FrameKind::Scc12).unwrap().signal("aReqValue"), Some(-3.5));
    assert_eq!(out.applied.accel, -3.5);
}
