//! Cruise button pacing through whole sessions.

use actuation_common::controller::intent::{ActuatorIntent, ButtonIntent};
use actuation_common::controller::message::FrameKind;
use actuation_common::controller::snapshot::VehicleStateSnapshot;

use super::{SONATA_LIMITS, session};

fn count(out: &actuation_controller::cycle::TickOutput, kind: FrameKind) -> usize {
    out.messages.iter().filter(|m| m.kind == kind).count()
}

#[test]
fn legacy_resume_bursts_at_zero_and_eleven() {
    let mut handle = session("model = \"HYUNDAI_SONATA\"", SONATA_LIMITS);
    let resume = ActuatorIntent {
        button: ButtonIntent::Resume,
        ..Default::default()
    };
    let snapshot = VehicleStateSnapshot {
        button_counter: 15,
        ..Default::default()
    };

    let bursts: Vec<(u64, usize)> = (0..=11u64)
        .filter_map(|frame| {
            let out = handle.tick(&resume, &snapshot);
            let n = count(&out, FrameKind::Clu11);
            (n > 0).then_some((frame, n))
        })
        .collect();
    assert_eq!(bursts, vec![(0, 25), (11, 25)]);
}

#[test]
fn legacy_press_counter_wraps() {
    let mut handle = session("model = \"HYUNDAI_SONATA\"", SONATA_LIMITS);
    let cancel = ActuatorIntent {
        button: ButtonIntent::Cancel,
        ..Default::default()
    };
    let snapshot = VehicleStateSnapshot {
        button_counter: 15,
        ..Default::default()
    };
    let out = handle.tick(&cancel, &snapshot);
    let clu11: Vec<_> = out.messages.iter().filter(|m| m.kind == FrameKind::Clu11).collect();
    assert_eq!(clu11.len(), 1);
    assert_eq!(clu11[0].signal("CF_Clu_CruiseSwState"), Some(4.0));
    assert_eq!(clu11[0].signal("CF_Clu_AliveCnt1"), Some(0.0));
}

#[test]
fn own_longitudinal_never_sends_buttons() {
    let mut handle = session(
        "model = \"HYUNDAI_SONATA\"\nown_longitudinal = true",
        SONATA_LIMITS,
    );
    for button in [ButtonIntent::Cancel, ButtonIntent::Resume] {
        let intent = ActuatorIntent {
            button,
            ..Default::default()
        };
        for _ in 0..30 {
            let out = handle.tick(&intent, &VehicleStateSnapshot::default());
            assert_eq!(count(&out, FrameKind::Clu11), 0);
        }
    }
}

#[test]
fn extended_cancel_is_gated_to_quarter_second() {
    let mut handle = session("model = \"KIA_EV6\"", SONATA_LIMITS);
    let cancel = ActuatorIntent {
        button: ButtonIntent::Cancel,
        ..Default::default()
    };
    let mut bursts = Vec::new();
    for frame in 0..60u64 {
        let out = handle.tick(&cancel, &VehicleStateSnapshot::default());
        let n = count(&out, FrameKind::FdCruiseButtons);
        if n > 0 {
            bursts.push((frame, n));
        }
    }
    assert_eq!(bursts, vec![(0, 20), (26, 20), (52, 20)]);
}

#[test]
fn alternate_buttons_cancel_through_cruise_info() {
    let mut handle = session("model = \"KIA_SORENTO_4TH_GEN\"", SONATA_LIMITS);
    let cancel = ActuatorIntent {
        button: ButtonIntent::Cancel,
        ..Default::default()
    };
    let out = handle.tick(&cancel, &VehicleStateSnapshot::default());
    assert_eq!(count(&out, FrameKind::FdCruiseButtons), 0);
    let info: Vec<_> = out.messages.iter().filter(|m| m.kind == FrameKind::FdCruiseInfo).collect();
    assert_eq!(info.len(), 1);
    assert_eq!(info[0].signal("CRUISE_STATUS"), Some(0.0));
    assert_eq!(info[0].signal("CRUISE_INACTIVE"), Some(1.0));

    // Resume has no path on these vehicles.
    let resume = ActuatorIntent {
        button: ButtonIntent::Resume,
        ..Default::default()
    };
    for _ in 0..60 {
        let out = handle.tick(&resume, &VehicleStateSnapshot::default());
        assert_eq!(out.messages.len(), 1 + count(&out, FrameKind::FdLfahdaCluster));
    }
}
