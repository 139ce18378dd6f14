//! Steer torque rate limiter and feedback guard.
//!
//! The limiter saturates the request to `±steer_max`, then bounds the step
//! from the previous applied command. Magnitude increases move at most
//! `steer_up_rate` per tick, magnitude decreases at most `steer_down_rate`.
//! A request that fights the driver beyond `driver_override_threshold` is
//! bounded symmetrically by the smaller of the two rates.

use actuation_common::controller::limits::Limits;
use actuation_common::controller::state::ControllerState;

/// Limit one steer request. Pure; every input is clamped, nothing fails.
#[inline]
pub fn limit_steer(requested: i32, previous: i32, driver_torque: i32, limits: &Limits) -> i32 {
    let max = limits.steer_max;
    let up = limits.steer_up_rate;
    let down = limits.steer_down_rate;
    let requested = requested.clamp(-max, max);

    let opposing = requested != 0
        && driver_torque.unsigned_abs() > limits.driver_override_threshold.unsigned_abs()
        && requested.signum() != driver_torque.signum();

    let (lo, hi) = if opposing {
        let slow = up.min(down);
        (previous - slow, previous + slow)
    } else if previous > 0 {
        ((previous - down).max(-up), previous + up)
    } else {
        (previous - up, (previous + down).min(up))
    };

    requested.clamp(lo, hi)
}

/// Scale a steer fraction to command units.
///
/// Non-finite fractions map to 0. Returns the command and whether the
/// fraction had to be clamped to `[-cap, cap]`.
#[inline]
pub fn steer_command(fraction: f64, limits: &Limits) -> (i32, bool, bool) {
    if !fraction.is_finite() {
        return (0, false, true);
    }
    let cap = limits.steer_fraction_cap;
    let clamped = fraction.clamp(-cap, cap);
    let command = (clamped * limits.steer_max as f64).round() as i32;
    (command, clamped != fraction, false)
}

/// Why a stored previous command was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// Outside `±steer_max`; cannot have come from the limiter.
    OutOfRange,
    /// Not produced by the immediately preceding frame.
    FrameGap,
    /// Jumped further than one tick's maximum step from its predecessor.
    Discontinuity,
}

/// Previous applied steer, validated.
///
/// A stale value is replaced by 0 by the caller.
pub fn previous_steer(state: &ControllerState, limits: &Limits) -> Result<i32, StaleReason> {
    let last = state.last_applied_steer;
    if last == 0 {
        return Ok(0);
    }
    if last.unsigned_abs() > limits.steer_max.unsigned_abs() {
        return Err(StaleReason::OutOfRange);
    }
    if state.applied_frame.is_none() || state.applied_frame != state.frame.checked_sub(1) {
        return Err(StaleReason::FrameGap);
    }
    let step = (i64::from(last) - i64::from(state.prior_applied_steer)).unsigned_abs();
    if step > u64::from(limits.max_step().unsigned_abs()) {
        return Err(StaleReason::Discontinuity);
    }
    Ok(last)
}
