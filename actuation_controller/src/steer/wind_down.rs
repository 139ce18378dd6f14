//! Lateral wind-down state machine.
//!
//! Active → WindingDown → Idle, with the wind-down cancelled outright when
//! the driver takes over. While winding down the limiter is fed a zero
//! request so the command ramps instead of stepping.

use actuation_common::controller::state::WindDownPhase;

/// What the limiter should be asked for this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteerRequest {
    /// Follow the upstream steer request.
    Follow,
    /// Request zero through the rate limiter.
    Ramp,
    /// Command zero immediately, bypassing the limiter.
    Cut,
}

/// Pre-limiter transition.
///
/// `last_applied` is the validated previous command.
pub fn transition(
    phase: WindDownPhase,
    lat_active: bool,
    steering_pressed: bool,
    last_applied: i32,
) -> (WindDownPhase, SteerRequest) {
    use WindDownPhase::*;

    if lat_active {
        return (Active, SteerRequest::Follow);
    }

    match phase {
        Active if last_applied == 0 => (Idle, SteerRequest::Ramp),
        // Driver override cancels the ramp before it starts.
        Active if steering_pressed => (Active, SteerRequest::Cut),
        Active => (WindingDown, SteerRequest::Ramp),
        WindingDown if steering_pressed => (Active, SteerRequest::Cut),
        WindingDown => (WindingDown, SteerRequest::Ramp),
        Idle => (Idle, SteerRequest::Ramp),
    }
}

/// Post-limiter transition: the ramp ends on the tick that reaches zero.
#[inline]
pub const fn settle(phase: WindDownPhase, applied: i32) -> WindDownPhase {
    match phase {
        WindDownPhase::WindingDown if applied == 0 => WindDownPhase::Idle,
        other => other,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
