//! Slot periodicity and assembly order.

use std::collections::BTreeMap;

use actuation_common::controller::intent::ActuatorIntent;
use actuation_common::controller::message::FrameKind;
use actuation_common::controller::snapshot::VehicleStateSnapshot;
use actuation_common::controller::state::ControllerState;

use super::{SONATA_LIMITS, session};

const OWN_LONG: &str = "model = \"HYUNDAI_SONATA\"\nown_longitudinal = true";

#[test]
fn legacy_own_long_frame_counts_over_one_second() {
    let mut handle = session(OWN_LONG, SONATA_LIMITS);
    let mut counts: BTreeMap<FrameKind, usize> = BTreeMap::new();
    let mut acc_option_frames = Vec::new();

    for frame in 0..100u64 {
        let out = handle.tick(&ActuatorIntent::default(), &VehicleStateSnapshot::default());
        for m in &out.messages {
            *counts.entry(m.kind).or_default() += 1;
        }
        if out.messages.iter().any(|m| m.kind == FrameKind::Scc13) {
            acc_option_frames.push(frame);
        }
    }

    assert_eq!(counts[&FrameKind::Lkas11], 100);
    assert_eq!(counts[&FrameKind::Scc11], 50);
    assert_eq!(counts[&FrameKind::Scc12], 50);
    assert_eq!(counts[&FrameKind::Scc14], 50);
    assert_eq!(counts[&FrameKind::LfahdaMfc], 20);
    assert_eq!(counts[&FrameKind::Scc13], 5);
    assert_eq!(counts[&FrameKind::Fca12], 5);
    assert_eq!(counts[&FrameKind::FrtRadar11], 2);
    assert_eq!(counts[&FrameKind::TesterPresent], 1);
    assert!(!counts.contains_key(&FrameKind::Clu11));
    assert_eq!(acc_option_frames, vec![0, 20, 40, 60, 80]);
}

#[test]
fn frame_zero_assembly_order() {
    let mut handle = session(OWN_LONG, SONATA_LIMITS);
    let out = handle.tick(&ActuatorIntent::default(), &VehicleStateSnapshot::default());
    let kinds: Vec<FrameKind> = out.messages.iter().map(|m| m.kind).collect();
    assert_eq!(
        kinds,
        vec![
            FrameKind::Lkas11,
            FrameKind::Scc11,
            FrameKind::Scc12,
            FrameKind::Scc14,
            FrameKind::LfahdaMfc,
            FrameKind::Scc13,
            FrameKind::Fca12,
            FrameKind::FrtRadar11,
            FrameKind::TesterPresent,
        ]
    );
}

#[test]
fn extended_hda2_camera_block_every_fifth_tick() {
    let mut handle = session("model = \"KIA_EV6\"", SONATA_LIMITS);
    for frame in 0..20u64 {
        let out = handle.tick(&ActuatorIntent::default(), &VehicleStateSnapshot::default());
        assert_eq!(out.messages[0].kind, FrameKind::FdLkas);
        let camera = out.messages.iter().any(|m| m.kind == FrameKind::FdCameraBlock);
        assert_eq!(camera, frame % 5 == 0, "frame {frame}");
        assert!(out.messages.iter().all(|m| m.kind != FrameKind::FdLfahdaCluster));
    }
}

#[test]
fn extended_without_hda2_sends_cluster_icons_at_50hz() {
    let mut handle = session("model = \"HYUNDAI_TUCSON_4TH_GEN\"", SONATA_LIMITS);
    for frame in 0..10u64 {
        let out = handle.tick(&ActuatorIntent::default(), &VehicleStateSnapshot::default());
        let icons = out.messages.iter().any(|m| m.kind == FrameKind::FdLfahdaCluster);
        assert_eq!(icons, frame % 2 == 0);
        assert!(out.messages.iter().all(|m| m.kind != FrameKind::FdCameraBlock));
    }
}

#[test]
fn identical_inputs_give_identical_outputs() {
    let handle = session(OWN_LONG, SONATA_LIMITS);
    let scheduler = handle.scheduler();
    let intent = ActuatorIntent {
        enabled: true,
        lat_active: true,
        long_active: true,
        steer: 0.4,
        accel: 0.7,
        ..Default::default()
    };
    let snapshot = VehicleStateSnapshot {
        speed: 12.0,
        steering_torque: 30,
        ..Default::default()
    };
    let state = ControllerState {
        frame: 40,
        ..ControllerState::new()
    };
    let a = scheduler.tick(&intent, &snapshot, &state);
    let b = scheduler.tick(&intent, &snapshot, &state);
    assert_eq!(a, b);
    assert_eq!(a.state.frame, 41);
}
