//! Per-tick control intents produced upstream.
//!
//! Intents are consumed immediately and never retained. Out-of-range values
//! are clamped by the scheduler, never rejected.

use serde::{Deserialize, Serialize};

/// Upstream longitudinal controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LongControlState {
    #[default]
    Off,
    /// Steady tracking of the planned acceleration.
    Pid,
    Stopping,
    Starting,
}

/// Cruise-control button intent. Cancel and resume never share a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonIntent {
    #[default]
    None,
    Cancel,
    /// Resume from standstill.
    Resume,
}

impl ButtonIntent {
    /// Resolve the two raw cruise flags; cancel wins.
    pub const fn from_flags(cancel: bool, resume: bool) -> Self {
        if cancel {
            Self::Cancel
        } else if resume {
            Self::Resume
        } else {
            Self::None
        }
    }
}

/// Alert requested on the instrument cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualAlert {
    #[default]
    None,
    SteerRequired,
    /// Lane departure warning.
    LaneDeparture,
    BrakePressed,
    Fcw,
}

/// HUD-related intents.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HudIntent {
    pub visual_alert: VisualAlert,
    pub left_lane_visible: bool,
    pub right_lane_visible: bool,
    pub left_lane_depart: bool,
    pub right_lane_depart: bool,
    pub lead_visible: bool,
    /// Cruise set speed [m/s].
    pub set_speed: f64,
}

/// One tick's desired actuator output.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActuatorIntent {
    /// Whether the automation is engaged at all.
    pub enabled: bool,
    pub lat_active: bool,
    pub long_active: bool,
    /// Requested steering torque as a fraction of `steer_max`, in [-1, 1].
    pub steer: f64,
    /// Requested longitudinal acceleration [m/s²].
    pub accel: f64,
    pub long_control_state: LongControlState,
    pub button: ButtonIntent,
    pub hud: HudIntent,
}
