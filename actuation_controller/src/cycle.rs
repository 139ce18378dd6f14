//! Deterministic tick: intent + snapshot + state → messages + new state.
//!
//! [`Scheduler::tick`] is a pure function of its inputs. It never mutates
//! the state it is given; the caller stores the returned state and passes
//! it back next tick. The frame counter used for this tick's period checks
//! is `state.frame`; the returned state carries `frame + 1`.
//!
//! ## Per-tick sequence
//! 1. Steer fraction → command units (cap, clamp, sanitise).
//! 2. Validate the stored previous command (stale → 0).
//! 3. Wind-down transition, rate limiter, post-limit settle.
//! 4. HUD encoding.
//! 5. Due slots in assembly order → outbox.

use actuation_common::consts::{DT_CTRL, MAX_MESSAGES_PER_TICK};
use actuation_common::controller::flags::InputFlags;
use actuation_common::controller::intent::ActuatorIntent;
use actuation_common::controller::message::OutboundMessage;
use actuation_common::controller::snapshot::VehicleStateSnapshot;
use actuation_common::controller::state::{AppliedActuators, ControllerState};
use actuation_common::controller::vehicle::{DialectKind, ResolvedVehicle};
use heapless::Vec;
use tracing::warn;

use crate::buttons::{self, ButtonAction};
use crate::frames::{FrameContext, Outbox, extended, legacy};
use crate::hud;
use crate::longitudinal;
use crate::schedule::dialect::Dialect;
use crate::schedule::table::Slot;
use crate::steer::rate_limit::{limit_steer, previous_steer, steer_command};
use crate::steer::wind_down::{self, SteerRequest};

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    /// Outbound frames in assembly order.
    pub messages: Vec<OutboundMessage, MAX_MESSAGES_PER_TICK>,
    /// State to store and pass to the next tick.
    pub state: ControllerState,
    /// What was actually commanded after limiting.
    pub applied: AppliedActuators,
    pub flags: InputFlags,
}

/// Session-scoped tick evaluator. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Scheduler {
    vehicle: ResolvedVehicle,
    dialect: Dialect,
}

impl Scheduler {
    pub fn new(vehicle: ResolvedVehicle) -> Self {
        let dialect = Dialect::resolve(&vehicle);
        Self { vehicle, dialect }
    }

    #[inline]
    pub fn vehicle(&self) -> &ResolvedVehicle {
        &self.vehicle
    }

    #[inline]
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub fn tick(
        &self,
        intent: &ActuatorIntent,
        snapshot: &VehicleStateSnapshot,
        state: &ControllerState,
    ) -> TickOutput {
        let limits = &self.vehicle.limits;
        let frame = state.frame;
        let mut next = *state;
        let mut flags = InputFlags::empty();

        // ── Lateral ──
        let apply_steer = self.steer(intent, snapshot, state, &mut next, &mut flags);
        let hud = hud::encode(&intent.hud, intent.enabled, self.vehicle.depart_warning_code);

        // ── Assembly ──
        let ctx = FrameContext {
            frame,
            intent,
            snapshot,
            routes: &self.vehicle.routes,
            capabilities: self.vehicle.capabilities,
        };
        let legacy_dialect = self.dialect.kind() == DialectKind::Legacy;
        let mut out = Outbox::new();

        // The hold timer only runs while longitudinal control is engaged,
        // including on ticks without an accel evaluation.
        if !intent.long_active {
            next.stop_timer = 0.0;
        }

        for slot in self.dialect.table().due(frame) {
            match slot {
                Slot::Steering if legacy_dialect => {
                    out.push(legacy::lkas11(&ctx, apply_steer, next.wind_down.is_winding_down(), &hud));
                }
                Slot::Steering => out.push(extended::lkas(&ctx, apply_steer)),
                Slot::CameraBlock => out.push(extended::camera_block(&ctx)),
                Slot::HudIcons => out.push(extended::lfahda_cluster(&ctx)),
                Slot::Buttons => self.buttons(&ctx, state, &mut next, &mut out),
                Slot::AccelCommand => {
                    let cmd = longitudinal::compute(
                        intent,
                        snapshot,
                        state.stop_timer,
                        DT_CTRL,
                        limits,
                        &self.vehicle.tuning.jerk,
                    );
                    next.stop_timer = cmd.stop_timer;
                    next.last_applied_accel = cmd.accel;
                    flags |= cmd.flags;
                    legacy::acc_commands(&ctx, &cmd, &mut out);
                }
                Slot::DisplayHud => out.push(legacy::lfahda_mfc(&ctx)),
                Slot::AccOptions => legacy::acc_options(&ctx, &mut out),
                Slot::RadarOptions => out.push(legacy::frt_radar_options(&ctx)),
                Slot::TesterPresent => out.push(legacy::tester_present(&ctx)),
            }
        }

        if out.overflowed() {
            flags |= InputFlags::OUTBOX_OVERFLOW;
        }
        next.frame = frame.saturating_add(1);

        TickOutput {
            messages: out.into_messages(),
            applied: AppliedActuators {
                steer: f64::from(next.last_applied_steer) / f64::from(limits.steer_max),
                accel: next.last_applied_accel,
            },
            state: next,
            flags,
        }
    }

    /// Lateral path. Writes the steer fields of `next`, returns the command.
    fn steer(
        &self,
        intent: &ActuatorIntent,
        snapshot: &VehicleStateSnapshot,
        state: &ControllerState,
        next: &mut ControllerState,
        flags: &mut InputFlags,
    ) -> i32 {
        let limits = &self.vehicle.limits;

        let (requested, clamped, non_finite) = steer_command(intent.steer, limits);
        if clamped {
            *flags |= InputFlags::STEER_CLAMPED;
        }
        if non_finite {
            *flags |= InputFlags::NON_FINITE_INPUT;
        }

        let previous = match previous_steer(state, limits) {
            Ok(previous) => previous,
            Err(reason) => {
                warn!(
                    frame = state.frame,
                    ?reason,
                    last = state.last_applied_steer,
                    "Stale steer feedback, limiting from zero"
                );
                *flags |= InputFlags::STALE_FEEDBACK;
                0
            }
        };

        let (phase, request) = wind_down::transition(
            state.wind_down,
            intent.lat_active,
            snapshot.steering_pressed,
            previous,
        );
        let torque = snapshot.steering_torque;
        let applied = match request {
            SteerRequest::Follow => limit_steer(requested, previous, torque, limits),
            SteerRequest::Ramp => limit_steer(0, previous, torque, limits),
            SteerRequest::Cut => 0,
        };

        next.prior_applied_steer = previous;
        next.last_applied_steer = applied;
        next.applied_frame = Some(state.frame);
        next.wind_down = wind_down::settle(phase, applied);
        applied
    }

    fn buttons(
        &self,
        ctx: &FrameContext<'_>,
        state: &ControllerState,
        next: &mut ControllerState,
        out: &mut Outbox,
    ) {
        let step = buttons::next(
            ctx.intent.button,
            ctx.snapshot.button_counter,
            state.last_button_frame,
            ctx.frame,
            self.dialect.buttons(),
        );
        next.last_button_frame = step.last_button_frame;

        match step.action {
            ButtonAction::None => {}
            ButtonAction::Press { button, copies } => {
                let msg = match self.dialect.kind() {
                    DialectKind::Legacy => legacy::clu11(ctx, button, step.counter),
                    DialectKind::Extended => extended::cruise_buttons(ctx, button, step.counter),
                };
                out.push_copies(msg, copies);
            }
            ButtonAction::CruiseInfoCancel => out.push(extended::cruise_info_cancel(ctx)),
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
