//! Scripted driving scenarios for the simulator.
//!
//! A scenario produces the intent for each tick and a [`SimVehicle`] turns
//! the applied actuators back into a vehicle state snapshot. The vehicle
//! model is a first-order accel lag with a brake hold at standstill; it is
//! only good enough to exercise every code path.

use actuation_common::consts::DT_CTRL;
use actuation_common::controller::intent::{
    ActuatorIntent, ButtonIntent, HudIntent, LongControlState, VisualAlert,
};
use actuation_common::controller::snapshot::VehicleStateSnapshot;
use actuation_common::controller::state::AppliedActuators;
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    /// Lane keeping on a gentle S-curve at cruise speed.
    Cruise,
    /// Lane keeping that disengages halfway through.
    WindDown,
    /// Stop, hold, then pull away under own longitudinal control.
    StopAndGo,
    /// Stopped behind stock cruise, resume requested repeatedly.
    Resume,
    /// Cruise cancel requested for one second.
    Cancel,
}

impl Scenario {
    /// Intent for `tick` of a run of `total` ticks.
    pub fn intent(&self, tick: u64, total: u64, vehicle: &SimVehicle) -> ActuatorIntent {
        let t = tick as f64 * DT_CTRL;
        let half = total / 2;
        let lanes = HudIntent {
            left_lane_visible: true,
            right_lane_visible: true,
            lead_visible: matches!(self, Self::StopAndGo),
            set_speed: 25.0,
            ..Default::default()
        };
        let base = ActuatorIntent {
            enabled: true,
            lat_active: true,
            hud: lanes,
            ..Default::default()
        };

        match self {
            Self::Cruise => ActuatorIntent {
                steer: 0.3 * (0.5 * t).sin(),
                long_active: true,
                accel: if vehicle.speed < 20.0 { 0.8 } else { 0.0 },
                long_control_state: LongControlState::Pid,
                ..base
            },
            Self::WindDown if tick < half => ActuatorIntent {
                steer: 0.5,
                ..base
            },
            Self::WindDown => ActuatorIntent {
                lat_active: false,
                hud: HudIntent {
                    visual_alert: VisualAlert::SteerRequired,
                    ..lanes
                },
                ..base
            },
            Self::StopAndGo => {
                let (accel, state) = if tick < half {
                    if vehicle.speed > 0.05 {
                        (-1.5, LongControlState::Stopping)
                    } else {
                        (-0.5, LongControlState::Stopping)
                    }
                } else {
                    (0.8, LongControlState::Pid)
                };
                ActuatorIntent {
                    long_active: true,
                    accel,
                    long_control_state: state,
                    ..base
                }
            }
            Self::Resume => ActuatorIntent {
                button: if tick >= half { ButtonIntent::Resume } else { ButtonIntent::None },
                ..base
            },
            Self::Cancel => ActuatorIntent {
                button: if tick < 100 { ButtonIntent::Cancel } else { ButtonIntent::None },
                ..base
            },
        }
    }

    /// Initial vehicle for the scenario.
    pub fn vehicle(&self) -> SimVehicle {
        match self {
            Self::Cruise | Self::WindDown | Self::Cancel => SimVehicle::moving(15.0),
            Self::StopAndGo => SimVehicle::moving(5.0),
            Self::Resume => SimVehicle::moving(0.0),
        }
    }
}

/// Minimal longitudinal vehicle model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimVehicle {
    pub speed: f64,
    pub accel: f64,
    pub brake_hold: bool,
    pub button_counter: u8,
    /// Ticks spent stopped.
    stopped_ticks: u32,
}

/// Accel lag time constant [s].
const ACCEL_TAU: f64 = 0.3;
/// Requested accel needed to break the brake hold [m/s²].
const HOLD_RELEASE_ACCEL: f64 = 0.9;

impl SimVehicle {
    pub const fn moving(speed: f64) -> Self {
        Self {
            speed,
            accel: 0.0,
            brake_hold: false,
            button_counter: 0,
            stopped_ticks: 0,
        }
    }

    /// Advance one tick under the applied actuators.
    pub fn step(&mut self, applied: &AppliedActuators, intent: &ActuatorIntent) {
        let target = if intent.long_active { applied.accel } else { 0.0 };

        if self.brake_hold && target >= HOLD_RELEASE_ACCEL {
            self.brake_hold = false;
        }
        let target = if self.brake_hold { 0.0 } else { target };

        self.accel += (target - self.accel) * (DT_CTRL / ACCEL_TAU);
        self.speed = (self.speed + self.accel * DT_CTRL).max(0.0);

        if self.speed < 0.05 {
            self.stopped_ticks = self.stopped_ticks.saturating_add(1);
            // Brake controller latches the hold after a short standstill.
            if self.stopped_ticks > 10 && target <= 0.0 {
                self.brake_hold = true;
            }
        } else {
            self.stopped_ticks = 0;
        }
        self.button_counter = self.button_counter.wrapping_add(1);
    }

    pub fn snapshot(&self, steer_torque: i32) -> VehicleStateSnapshot {
        VehicleStateSnapshot {
            steering_torque: steer_torque,
            steering_pressed: false,
            accel: self.accel,
            speed: self.speed,
            gas_pressed: false,
            brake_control_active: self.brake_hold,
            button_counter: self.button_counter,
            speed_unit_imperial: false,
            stock: Default::default(),
        }
    }
}
