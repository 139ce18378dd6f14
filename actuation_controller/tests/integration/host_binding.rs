//! Host loop over the loopback transport and config faults from disk.

use std::io::Write;

use actuation_common::config::ConfigError;
use actuation_common::controller::intent::ActuatorIntent;
use actuation_common::controller::message::FrameKind;
use actuation_common::controller::snapshot::VehicleStateSnapshot;
use actuation_controller::config::load_config;
use actuation_controller::host::{HostError, LoopbackTransport, PlainEncoder, drive_tick, verify_encoder};
use actuation_controller::session::init_session;
use tempfile::NamedTempFile;

const LEGACY: &str = r#"
[shared]
service_name = "loop"

[vehicle]
model = "HYUNDAI_SONATA"
own_longitudinal = true

[limits]
steer_max = 384
steer_up_rate = 3
steer_down_rate = 7
driver_override_threshold = 50
accel_min = -3.5
accel_max = 2.0
"#;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn loopback_publishes_every_assembled_frame() {
    let file = write_config(LEGACY);
    let loaded = load_config(file.path()).unwrap();
    let mut handle = init_session("loop-1", &loaded.config).unwrap();
    let encoder = PlainEncoder::new();
    verify_encoder(&handle, &encoder).unwrap();

    let mut transport = LoopbackTransport::new(1);
    let intent = ActuatorIntent {
        enabled: true,
        lat_active: true,
        long_active: true,
        steer: 0.2,
        accel: 0.3,
        ..Default::default()
    };

    assert!(matches!(
        drive_tick(&mut handle, &mut transport, &encoder, &intent),
        Err(HostError::NoVehicleState)
    ));
    assert_eq!(handle.state().frame, 0);

    transport.set_state(VehicleStateSnapshot {
        speed: 15.0,
        ..Default::default()
    });
    let mut expected = 0;
    for _ in 0..200 {
        let out = drive_tick(&mut handle, &mut transport, &encoder, &intent).unwrap();
        expected += out.messages.len();
    }
    assert_eq!(transport.published().len(), expected);
    assert!(transport.published().iter().all(|(bus, _)| *bus == 0));

    let summary = handle.close();
    assert_eq!(summary.stats.tick_count, 200);
    assert_eq!(summary.final_state.frame, 200);
}

#[test]
fn extended_session_needs_its_buses_attached() {
    let mut handle = init_session(
        "fd",
        &actuation_controller::config::load_config_from_str(
            &LEGACY
                .replace("HYUNDAI_SONATA", "KIA_EV6")
                .replace("own_longitudinal = true", ""),
        )
        .unwrap()
        .config,
    )
    .unwrap();
    let encoder = PlainEncoder::new()
        .with_signal(FrameKind::FdCameraBlock, "BYTE7");
    let mut transport = LoopbackTransport::new(1);
    transport.set_state(VehicleStateSnapshot::default());

    let err = drive_tick(&mut handle, &mut transport, &encoder, &ActuatorIntent::default()).unwrap_err();
    assert!(matches!(err, HostError::Transport(_)));
    // The tick itself still advanced.
    assert_eq!(handle.state().frame, 1);

    let mut transport = LoopbackTransport::new(6);
    transport.set_state(VehicleStateSnapshot::default());
    let out = drive_tick(&mut handle, &mut transport, &encoder, &ActuatorIntent::default()).unwrap();
    assert_eq!(transport.published().len(), out.messages.len());
}

#[test]
fn missing_file_is_reported() {
    let err = load_config(std::path::Path::new("/nonexistent/vehicle.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(_)));
}

#[test]
fn unknown_model_is_reported() {
    let file = write_config(&LEGACY.replace("HYUNDAI_SONATA", "TOYOTA_PRIUS"));
    let err = load_config(file.path()).unwrap_err();
    assert_eq!(err, ConfigError::UnknownVehicle("TOYOTA_PRIUS".to_string()));
}

#[test]
fn zero_rate_is_rejected() {
    let file = write_config(&LEGACY.replace("steer_up_rate = 3", "steer_up_rate = 0"));
    assert!(matches!(load_config(file.path()), Err(ConfigError::ValidationError(_))));
}

#[test]
fn colliding_routes_are_rejected() {
    let doc = format!("{LEGACY}\n[messages.SCC12]\naddress = 0x340\nbus = 0\n");
    let file = write_config(&doc);
    assert!(matches!(load_config(file.path()), Err(ConfigError::ValidationError(_))));
}

#[test]
fn malformed_toml_is_parse_error() {
    let file = write_config("[shared\nservice_name = ");
    assert!(matches!(load_config(file.path()), Err(ConfigError::ParseError(_))));
}
