//! Read-only vehicle state sampled once per tick.

use serde::Serialize;

use super::message::SignalSet;

/// Latest decoded stock frames that outbound frames copy from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StockFrames {
    /// Stock lane-keeping frame (legacy dialect).
    pub lkas11: SignalSet,
    /// Stock cluster frame (legacy dialect).
    pub clu11: SignalSet,
    /// Stock cruise-info frame (extended dialect, alternate buttons).
    pub cruise_info: SignalSet,
    /// Stock camera block frame (extended dialect, HDA2).
    pub camera_block: SignalSet,
}

/// Sensed facts needed this tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VehicleStateSnapshot {
    /// Driver-applied steering torque, in steer command units.
    pub steering_torque: i32,
    pub steering_pressed: bool,
    /// Measured longitudinal acceleration [m/s²].
    pub accel: f64,
    /// Raw vehicle speed [m/s].
    pub speed: f64,
    pub gas_pressed: bool,
    /// Brake controller is actively holding the vehicle.
    pub brake_control_active: bool,
    /// Rolling counter of the last observed button frame.
    pub button_counter: u8,
    /// Cluster displays imperial units.
    pub speed_unit_imperial: bool,
    pub stock: StockFrames,
}
