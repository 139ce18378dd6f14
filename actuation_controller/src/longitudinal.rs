//! Longitudinal accel and jerk-bound computation.
//!
//! Jerk bounds are asymmetric: the upper bound is proportional
//! to the accel error and capped low, the lower bound is pinned at its
//! maximum so deceleration stays crisp. A stopped vehicle held by the brake
//! controller gets a fixed push (`hold_release_*`) to break the hold.

use actuation_common::controller::flags::InputFlags;
use actuation_common::controller::intent::{ActuatorIntent, LongControlState};
use actuation_common::controller::limits::{JerkTuning, Limits};
use actuation_common::controller::snapshot::VehicleStateSnapshot;

/// Slack on the hold timer comparison so accumulated `dt` steps reach the
/// threshold on the intended evaluation.
const TIMER_EPSILON: f64 = 1e-9;

/// Output of one longitudinal evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongitudinalCommand {
    /// Final accel after clamping [m/s²].
    pub accel: f64,
    pub jerk_upper: f64,
    pub jerk_lower: f64,
    /// Updated stop timer [s].
    pub stop_timer: f64,
    /// Display-only stopping flag.
    pub stopping: bool,
    pub starting_from_hold: bool,
    pub flags: InputFlags,
}

/// Compute accel and jerk bounds for one evaluation.
pub fn compute(
    intent: &ActuatorIntent,
    snapshot: &VehicleStateSnapshot,
    stop_timer: f64,
    dt: f64,
    limits: &Limits,
    tuning: &JerkTuning,
) -> LongitudinalCommand {
    let mut flags = InputFlags::empty();

    let mut accel = finite_or_zero(intent.accel, &mut flags);
    let requested = accel;
    let measured = finite_or_zero(snapshot.accel, &mut flags);
    // NaN speed compares false: treated as moving.
    let stopped = snapshot.speed < tuning.stop_speed;

    let stop_timer = if intent.long_active && stopped {
        stop_timer + dt
    } else {
        0.0
    };

    let mut jerk_upper = 0.0;
    let mut jerk_lower = 0.0;
    let mut starting_from_hold = false;

    if intent.long_active {
        let accel_error = requested - measured;
        jerk_upper = (tuning.jerk_upper_gain * accel_error).clamp(0.0, tuning.jerk_upper_max);
        jerk_lower = tuning.jerk_lower;

        starting_from_hold = stop_timer + TIMER_EPSILON >= tuning.hold_time
            && intent.long_control_state == LongControlState::Pid
            && requested > tuning.start_accel_threshold
            && snapshot.brake_control_active;
        if starting_from_hold {
            accel = tuning.hold_release_accel;
            jerk_upper = tuning.hold_release_jerk;
        }
    }

    let clamped = accel.clamp(limits.accel_min, limits.accel_max);
    if clamped != accel {
        flags |= InputFlags::ACCEL_CLAMPED;
    }

    LongitudinalCommand {
        accel: clamped,
        jerk_upper,
        jerk_lower,
        stop_timer,
        stopping: stopped && clamped <= 0.0,
        starting_from_hold,
        flags,
    }
}

#[inline]
fn finite_or_zero(value: f64, flags: &mut InputFlags) -> f64 {
    if value.is_finite() {
        value
    } else {
        *flags |= InputFlags::NON_FINITE_INPUT;
        0.0
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
