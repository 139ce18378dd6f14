//! Session lifecycle: init → tick* → close.
//!
//! A [`ControllerHandle`] exclusively owns one [`ControllerState`]. It is
//! `Send` so a host may move it to its control thread, but calls for one
//! vehicle must be serialised; the handle is never shared.

use std::time::Instant;

use actuation_common::config::ConfigError;
use actuation_common::controller::flags::InputFlags;
use actuation_common::controller::intent::ActuatorIntent;
use actuation_common::controller::snapshot::VehicleStateSnapshot;
use actuation_common::controller::state::ControllerState;
use actuation_common::controller::vehicle::{DialectKind, VehicleConfig};
use serde::Serialize;
use static_assertions::assert_impl_all;
use tracing::info;

use crate::config::validate_routes;
use crate::cycle::{Scheduler, TickOutput};

// ─── Tick Statistics ────────────────────────────────────────────────

/// O(1) per-tick statistics.
///
/// Timing fields measure the evaluation only, not the host's transport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickStats {
    /// Total ticks evaluated.
    pub tick_count: u64,
    /// Total outbound messages produced.
    pub messages: u64,
    /// Largest single-tick message count.
    pub max_messages: usize,
    /// Ticks with at least one clamped or sanitised input.
    pub clamped_ticks: u64,
    /// Ticks where the stored previous steer was rejected.
    pub stale_feedback: u64,
    /// Ticks that dropped messages on a full outbox.
    pub overflows: u64,
    /// Last tick duration [ns].
    pub last_tick_ns: u64,
    /// Minimum tick duration [ns].
    pub min_tick_ns: u64,
    /// Maximum tick duration [ns].
    pub max_tick_ns: u64,
    /// Running sum for average computation.
    pub sum_tick_ns: u64,
}

impl TickStats {
    pub const fn new() -> Self {
        Self {
            tick_count: 0,
            messages: 0,
            max_messages: 0,
            clamped_ticks: 0,
            stale_feedback: 0,
            overflows: 0,
            last_tick_ns: 0,
            min_tick_ns: u64::MAX,
            max_tick_ns: 0,
            sum_tick_ns: 0,
        }
    }

    /// Record one tick. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, output: &TickOutput, duration_ns: u64) {
        self.tick_count += 1;
        let n = output.messages.len();
        self.messages += n as u64;
        self.max_messages = self.max_messages.max(n);

        let flags = output.flags;
        if flags.intersects(InputFlags::STEER_CLAMPED | InputFlags::ACCEL_CLAMPED | InputFlags::NON_FINITE_INPUT) {
            self.clamped_ticks += 1;
        }
        if flags.contains(InputFlags::STALE_FEEDBACK) {
            self.stale_feedback += 1;
        }
        if flags.contains(InputFlags::OUTBOX_OVERFLOW) {
            self.overflows += 1;
        }

        self.last_tick_ns = duration_ns;
        self.min_tick_ns = self.min_tick_ns.min(duration_ns);
        self.max_tick_ns = self.max_tick_ns.max(duration_ns);
        self.sum_tick_ns = self.sum_tick_ns.saturating_add(duration_ns);
    }

    /// Average tick time [ns] (0 if no ticks).
    #[inline]
    pub fn avg_tick_ns(&self) -> u64 {
        if self.tick_count == 0 {
            0
        } else {
            self.sum_tick_ns / self.tick_count
        }
    }
}

impl Default for TickStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Session ────────────────────────────────────────────────────────

/// Final report returned by [`ControllerHandle::close`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub vehicle_id: String,
    pub model: &'static str,
    pub dialect: DialectKind,
    pub final_state: ControllerState,
    pub stats: TickStats,
}

/// Owner of one vehicle session.
#[derive(Debug)]
pub struct ControllerHandle {
    vehicle_id: String,
    scheduler: Scheduler,
    state: ControllerState,
    stats: TickStats,
}

assert_impl_all!(ControllerHandle: Send);

/// Validate `config`, resolve the vehicle and open a session.
///
/// # Errors
/// Any [`ConfigError`]; a session is never created from a partially valid
/// configuration.
pub fn init_session(vehicle_id: &str, config: &VehicleConfig) -> Result<ControllerHandle, ConfigError> {
    let vehicle = config.resolve()?;
    validate_routes(&vehicle)?;
    let scheduler = Scheduler::new(vehicle);

    info!(
        vehicle_id,
        model = vehicle.model,
        dialect = ?vehicle.dialect,
        capabilities = ?vehicle.capabilities,
        steer_max = vehicle.limits.steer_max,
        slots = scheduler.dialect().table().entries().len(),
        "Session opened"
    );

    Ok(ControllerHandle {
        vehicle_id: vehicle_id.to_owned(),
        scheduler,
        state: ControllerState::new(),
        stats: TickStats::new(),
    })
}

impl ControllerHandle {
    /// Evaluate one tick and store the resulting state.
    pub fn tick(&mut self, intent: &ActuatorIntent, snapshot: &VehicleStateSnapshot) -> TickOutput {
        let start = Instant::now();
        let output = self.scheduler.tick(intent, snapshot, &self.state);
        let elapsed = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);

        self.state = output.state;
        self.stats.record(&output, elapsed);
        output
    }

    /// Copy of the current state.
    #[inline]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    #[inline]
    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    #[inline]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    #[inline]
    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    /// Explicit state reset: frame counter back to 0, all feedback cleared.
    pub fn reset(&mut self) {
        info!(vehicle_id = %self.vehicle_id, frame = self.state.frame, "Controller state reset");
        self.state.reset();
    }

    pub fn close(self) -> SessionSummary {
        let vehicle = self.scheduler.vehicle();
        info!(
            vehicle_id = %self.vehicle_id,
            ticks = self.stats.tick_count,
            messages = self.stats.messages,
            stale_feedback = self.stats.stale_feedback,
            avg_tick_ns = self.stats.avg_tick_ns(),
            max_tick_ns = self.stats.max_tick_ns,
            "Session closed"
        );
        SessionSummary {
            model: vehicle.model,
            dialect: vehicle.dialect,
            vehicle_id: self.vehicle_id,
            final_state: self.state,
            stats: self.stats,
        }
    }
}
