//! Lane-keeping HUD state encoding.

use actuation_common::controller::intent::{HudIntent, VisualAlert};

/// Discrete cluster codes carried by the steering frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HudState {
    pub sys_warning: bool,
    /// 1 none, 3 both lanes/active, 4 both lanes/standby, 5 left, 6 right.
    pub sys_state: u8,
    pub left_lane_warning: u8,
    pub right_lane_warning: u8,
}

pub fn encode(hud: &HudIntent, enabled: bool, depart_warning_code: u8) -> HudState {
    let sys_warning = matches!(
        hud.visual_alert,
        VisualAlert::SteerRequired | VisualAlert::LaneDeparture
    );

    // The cluster shows alerts only while the lane-keeping status is active.
    let sys_state = if (hud.left_lane_visible && hud.right_lane_visible) || sys_warning {
        if enabled || sys_warning { 3 } else { 4 }
    } else if hud.left_lane_visible {
        5
    } else if hud.right_lane_visible {
        6
    } else {
        1
    };

    let warning = |depart: bool| if depart { depart_warning_code } else { 0 };

    HudState {
        sys_warning,
        sys_state,
        left_lane_warning: warning(hud.left_lane_depart),
        right_lane_warning: warning(hud.right_lane_depart),
    }
}
