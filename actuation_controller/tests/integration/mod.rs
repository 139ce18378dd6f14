mod buttons;
mod host_binding;
mod longitudinal;
mod schedule;
mod steering;

use actuation_common::config::ConfigLoader;
use actuation_common::controller::vehicle::VehicleConfig;
use actuation_controller::session::{ControllerHandle, init_session};

/// Session from a TOML document with the given `[vehicle]` body and limits.
pub fn session(vehicle: &str, limits: &str) -> ControllerHandle {
    let doc = format!(
        "[shared]\nservice_name = \"it\"\n\n[vehicle]\n{vehicle}\n\n[limits]\n{limits}\naccel_min = -3.5\naccel_max = 2.0\n"
    );
    let config = VehicleConfig::from_toml(&doc).unwrap();
    init_session("it", &config).unwrap()
}

pub const WIDE_LIMITS: &str = "steer_max = 1000\nsteer_up_rate = 10\nsteer_down_rate = 25\ndriver_override_threshold = 50";
pub const SONATA_LIMITS: &str = "steer_max = 384\nsteer_up_rate = 3\nsteer_down_rate = 7\ndriver_override_threshold = 50";
