//! Vehicle limits and tunable policy constants.
//!
//! All numeric parameters carry `MIN`/`MAX` bounds checked by `validate()`.
//! Tuning values are empirical; they are configuration, not derived.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::consts::MAX_BURST;

/// Upper bound for `steer_max` [command units].
pub const STEER_MAX_LIMIT: i32 = 4096;
/// Absolute bound for configured acceleration limits [m/s²].
pub const ACCEL_LIMIT_ABS: f64 = 10.0;

/// Immutable vehicle bounds for one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum steer command magnitude.
    pub steer_max: i32,
    /// Per-tick step when the command magnitude grows.
    pub steer_up_rate: i32,
    /// Per-tick step when the command magnitude shrinks.
    pub steer_down_rate: i32,
    /// Driver torque beyond which a contrary request is slowed.
    pub driver_override_threshold: i32,
    /// Minimum commanded acceleration [m/s²].
    pub accel_min: f64,
    /// Maximum commanded acceleration [m/s²].
    pub accel_max: f64,
    /// Cap on the requested steer fraction (high-torque variants).
    #[serde(default = "default_steer_fraction_cap")]
    pub steer_fraction_cap: f64,
}

fn default_steer_fraction_cap() -> f64 {
    1.0
}

impl Limits {
    /// Largest step the rate limiter can take in one tick.
    #[inline]
    pub const fn max_step(&self) -> i32 {
        if self.steer_up_rate > self.steer_down_rate {
            self.steer_up_rate
        } else {
            self.steer_down_rate
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steer_max <= 0 || self.steer_max > STEER_MAX_LIMIT {
            return Err(invalid(format!(
                "limits.steer_max {} out of range [1, {STEER_MAX_LIMIT}]",
                self.steer_max
            )));
        }
        if self.steer_up_rate <= 0 || self.steer_up_rate > self.steer_max {
            return Err(invalid(format!(
                "limits.steer_up_rate {} out of range [1, {}]",
                self.steer_up_rate, self.steer_max
            )));
        }
        if self.steer_down_rate <= 0 || self.steer_down_rate > self.steer_max {
            return Err(invalid(format!(
                "limits.steer_down_rate {} out of range [1, {}]",
                self.steer_down_rate, self.steer_max
            )));
        }
        if self.driver_override_threshold < 0 {
            return Err(invalid("limits.driver_override_threshold must be >= 0".into()));
        }
        if !(self.accel_min.is_finite() && self.accel_max.is_finite())
            || self.accel_min < -ACCEL_LIMIT_ABS
            || self.accel_max > ACCEL_LIMIT_ABS
            || self.accel_min >= self.accel_max
        {
            return Err(invalid(format!(
                "limits.accel range [{}, {}] invalid (must lie within ±{ACCEL_LIMIT_ABS} and min < max)",
                self.accel_min, self.accel_max
            )));
        }
        if !(self.steer_fraction_cap > 0.0 && self.steer_fraction_cap <= 1.0) {
            return Err(invalid(format!(
                "limits.steer_fraction_cap {} out of range (0, 1]",
                self.steer_fraction_cap
            )));
        }
        Ok(())
    }
}

/// Longitudinal jerk policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JerkTuning {
    /// Gain from accel error to upper jerk bound.
    pub jerk_upper_gain: f64,
    /// Cap on the upper jerk bound [m/s³].
    pub jerk_upper_max: f64,
    /// Lower jerk bound, always saturated [m/s³].
    pub jerk_lower: f64,
    /// Speed below which the vehicle counts as stopped [m/s].
    pub stop_speed: f64,
    /// Time stopped before a start may release the brake hold [s].
    pub hold_time: f64,
    /// Minimum requested accel that counts as a start request [m/s²].
    pub start_accel_threshold: f64,
    /// Accel commanded while releasing the brake hold [m/s²].
    pub hold_release_accel: f64,
    /// Upper jerk bound while releasing the brake hold [m/s³].
    pub hold_release_jerk: f64,
}

impl Default for JerkTuning {
    fn default() -> Self {
        Self {
            jerk_upper_gain: 2.0,
            jerk_upper_max: 2.0,
            jerk_lower: 12.7,
            stop_speed: 0.05,
            hold_time: 0.25,
            start_accel_threshold: 0.01,
            hold_release_accel: 1.0,
            hold_release_jerk: 1.0,
        }
    }
}

impl JerkTuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("jerk_upper_gain", self.jerk_upper_gain),
            ("jerk_upper_max", self.jerk_upper_max),
            ("jerk_lower", self.jerk_lower),
            ("stop_speed", self.stop_speed),
            ("hold_time", self.hold_time),
            ("start_accel_threshold", self.start_accel_threshold),
            ("hold_release_accel", self.hold_release_accel),
            ("hold_release_jerk", self.hold_release_jerk),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!(
                    "tuning.jerk.{name} must be finite and >= 0 (got {value})"
                )));
            }
        }
        Ok(())
    }
}

/// Button pacing policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonTuning {
    /// Minimum spacing between legacy resume bursts [s].
    pub legacy_resume_gate: f64,
    /// Copies per legacy resume burst.
    pub legacy_resume_burst: usize,
    /// Minimum spacing between extended dialect presses [s].
    pub extended_gate: f64,
    /// Copies per extended cancel burst.
    pub extended_cancel_burst: usize,
}

impl Default for ButtonTuning {
    fn default() -> Self {
        Self {
            legacy_resume_gate: 0.1,
            legacy_resume_burst: 25,
            extended_gate: 0.25,
            extended_cancel_burst: 20,
        }
    }
}

impl ButtonTuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, burst) in [
            ("legacy_resume_burst", self.legacy_resume_burst),
            ("extended_cancel_burst", self.extended_cancel_burst),
        ] {
            if burst == 0 || burst > MAX_BURST {
                return Err(invalid(format!(
                    "tuning.buttons.{name} {burst} out of range [1, {MAX_BURST}]"
                )));
            }
        }
        for (name, gate) in [
            ("legacy_resume_gate", self.legacy_resume_gate),
            ("extended_gate", self.extended_gate),
        ] {
            if !gate.is_finite() || gate < 0.0 {
                return Err(invalid(format!(
                    "tuning.buttons.{name} must be finite and >= 0 (got {gate})"
                )));
            }
        }
        Ok(())
    }
}

/// Both tuning tables.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub jerk: JerkTuning,
    pub buttons: ButtonTuning,
}

impl Tuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jerk.validate()?;
        self.buttons.validate()
    }
}

fn invalid(reason: String) -> ConfigError {
    ConfigError::ValidationError(reason)
}
