//! # Actuation Controller Library
//!
//! Fixed-rate actuation command layer for a vehicle-automation stack.
//! Converts per-tick control intents into a deterministic, duty-cycled
//! sequence of outbound bus messages while enforcing steer rate limits,
//! a lateral wind-down, longitudinal jerk bounds and paced button presses.
//!
//! ## Tick Pipeline
//!
//! 1. **Lateral**: fraction → command, stale-feedback guard, wind-down,
//!    rate limiter
//! 2. **Longitudinal**: accel clamp, jerk bounds, brake-hold release
//!    (sub-rate, own longitudinal only)
//! 3. **Buttons**: gated cancel/resume bursts
//! 4. **Assembly**: due slots of the session's schedule table, in fixed
//!    order
//!
//! ## Zero-Allocation Tick
//!
//! Per-tick buffers are `heapless` collections sized by
//! `actuation_common::consts`. [`cycle::Scheduler::tick`] is pure: the
//! caller owns the state between ticks.

pub mod buttons;
pub mod config;
pub mod cycle;
pub mod frames;
pub mod host;
pub mod hud;
pub mod longitudinal;
pub mod scenario;
pub mod schedule;
pub mod session;
pub mod steer;
