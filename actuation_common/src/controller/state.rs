//! Persistent per-session controller state.
//!
//! Created at session start, mutated exactly once per tick by the owning
//! scheduler, dropped at session end. Telemetry consumers receive `Copy`
//! snapshots; nothing else holds a reference.

use serde::Serialize;

/// Lateral wind-down phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum WindDownPhase {
    /// Lateral control is commanding torque.
    Active,
    /// Lateral control released; command ramps to zero.
    WindingDown,
    /// No lateral command.
    #[default]
    Idle,
}

impl WindDownPhase {
    #[inline]
    pub const fn is_winding_down(&self) -> bool {
        matches!(self, Self::WindingDown)
    }
}

/// Mutable controller state carried from one tick to the next.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ControllerState {
    /// Frame counter; the value used by the next tick's period checks.
    pub frame: u64,
    /// Steer command applied on the previous tick.
    pub last_applied_steer: i32,
    /// Steer command applied on the tick before that.
    pub prior_applied_steer: i32,
    /// Frame that produced `last_applied_steer`.
    pub applied_frame: Option<u64>,
    pub wind_down: WindDownPhase,
    /// Time spent stopped with longitudinal control active [s].
    pub stop_timer: f64,
    /// Frame of the last paced button emission.
    pub last_button_frame: Option<u64>,
    /// Acceleration applied on the last longitudinal evaluation [m/s²].
    pub last_applied_accel: f64,
}

impl ControllerState {
    pub const fn new() -> Self {
        Self {
            frame: 0,
            last_applied_steer: 0,
            prior_applied_steer: 0,
            applied_frame: None,
            wind_down: WindDownPhase::Idle,
            stop_timer: 0.0,
            last_button_frame: None,
            last_applied_accel: 0.0,
        }
    }

    /// Explicit reset, the only way the frame counter goes backwards.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Ground truth of what was actually commanded this tick (post-limiting).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AppliedActuators {
    /// Applied steer as a fraction of `steer_max`.
    pub steer: f64,
    /// Applied acceleration [m/s²].
    pub accel: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_idle_at_frame_zero() {
        let s = ControllerState::new();
        assert_eq!(s, ControllerState::default());
        assert_eq!(s.frame, 0);
        assert_eq!(s.wind_down, WindDownPhase::Idle);
        assert!(s.last_button_frame.is_none());
    }

    #[test]
    fn reset_clears_everything() {
        let mut s = ControllerState {
            frame: 1234,
            last_applied_steer: 200,
            prior_applied_steer: 197,
            applied_frame: Some(1233),
            wind_down: WindDownPhase::Active,
            stop_timer: 0.3,
            last_button_frame: Some(1200),
            last_applied_accel: -1.0,
        };
        s.reset();
        assert_eq!(s, ControllerState::new());
    }
}
