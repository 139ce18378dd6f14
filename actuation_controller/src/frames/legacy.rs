//! Classic CAN frame builders.

use actuation_common::consts::{MAX_PAYLOAD, MAX_SIGNALS};
use actuation_common::controller::flags::Capabilities;
use actuation_common::controller::message::{FrameKind, OutboundMessage, Payload, Signal};
use heapless::Vec;
use static_assertions::const_assert;

use super::{FrameContext, Outbox, flag};
use crate::buttons::CruiseButton;
use crate::hud::HudState;
use crate::longitudinal::LongitudinalCommand;

/// Diagnostic tester-present with suppressed response.
pub const TESTER_PRESENT_PAYLOAD: [u8; 8] = [0x02, 0x3E, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00];
const_assert!(TESTER_PRESENT_PAYLOAD.len() <= MAX_PAYLOAD);

const MS_TO_MPH: f64 = 2.23694;
const MS_TO_KPH: f64 = 3.6;

/// LKAS11 fields written for every vehicle.
const LKAS11_BASE: usize = 8;
/// Extra LKAS11 fields for clusters with the lane-following display.
const LKAS11_DISPLAY: usize = 3;
const_assert!(LKAS11_BASE + LKAS11_DISPLAY <= MAX_SIGNALS);

/// Lane-keeping steering frame.
pub fn lkas11(ctx: &FrameContext<'_>, apply_steer: i32, wind_down: bool, hud: &HudState) -> OutboundMessage {
    let intent = ctx.intent;
    let mut sys_warning = if hud.sys_warning { 3.0 } else { 0.0 };
    let mut cluster = [Signal::new("", 0.0); LKAS11_DISPLAY];
    let mut extra = 0;

    // Clusters with the lane-following display read extra lane fields.
    if ctx.capabilities.contains(Capabilities::LFA_DISPLAY) {
        let lanes = u8::from(intent.hud.left_lane_visible) | (u8::from(intent.hud.right_lane_visible) << 1);
        cluster = [
            Signal::new("CF_Lkas_LdwsActivemode", f64::from(lanes)),
            Signal::new("CF_Lkas_LdwsOpt_USM", 2.0),
            Signal::new("CF_Lkas_FcwOpt_USM", if intent.enabled { 2.0 } else { 1.0 }),
        ];
        extra = cluster.len();
        if hud.sys_warning {
            sys_warning = 4.0;
        }
    }

    let base: [Signal; LKAS11_BASE] = [
        Signal::new("CF_Lkas_LdwsSysState", f64::from(hud.sys_state)),
        Signal::new("CF_Lkas_SysWarning", sys_warning),
        Signal::new("CF_Lkas_LdwsLHWarning", f64::from(hud.left_lane_warning)),
        Signal::new("CF_Lkas_LdwsRHWarning", f64::from(hud.right_lane_warning)),
        Signal::new("CR_Lkas_StrToqReq", f64::from(apply_steer)),
        Signal::new("CF_Lkas_ActToi", flag(intent.lat_active)),
        Signal::new("CF_Lkas_ToiFlt", flag(wind_down)),
        Signal::new("CF_Lkas_MsgCount", (ctx.frame % 16) as f64),
    ];

    let mut overrides = [Signal::new("", 0.0); LKAS11_BASE + LKAS11_DISPLAY];
    overrides[..LKAS11_BASE].copy_from_slice(&base);
    overrides[LKAS11_BASE..].copy_from_slice(&cluster);
    ctx.overlay(FrameKind::Lkas11, &ctx.snapshot.stock.lkas11, &overrides[..LKAS11_BASE + extra])
}

/// Cluster frame carrying a spoofed cruise button.
pub fn clu11(ctx: &FrameContext<'_>, button: CruiseButton, counter: u8) -> OutboundMessage {
    ctx.overlay(
        FrameKind::Clu11,
        &ctx.snapshot.stock.clu11,
        &[
            Signal::new("CF_Clu_CruiseSwState", f64::from(button.code())),
            Signal::new("CF_Clu_AliveCnt1", f64::from(counter % 16)),
        ],
    )
}

/// Accel/jerk group: SCC11, SCC12, SCC14.
pub fn acc_commands(ctx: &FrameContext<'_>, cmd: &LongitudinalCommand, out: &mut Outbox) {
    let intent = ctx.intent;
    let snapshot = ctx.snapshot;
    let idx = ctx.frame / 2;
    let lead = flag(intent.hud.lead_visible);

    let unit = if snapshot.speed_unit_imperial { MS_TO_MPH } else { MS_TO_KPH };
    let set_speed = if intent.enabled && intent.hud.set_speed.is_finite() {
        intent.hud.set_speed * unit
    } else {
        0.0
    };

    let acc_mode = match (intent.enabled, snapshot.gas_pressed) {
        (true, true) => 2.0,
        (true, false) => 1.0,
        (false, _) => 0.0,
    };

    out.push(ctx.signals(
        FrameKind::Scc11,
        &[
            Signal::new("MainMode_ACC", 1.0),
            Signal::new("TauGapSet", 4.0),
            Signal::new("VSetDis", set_speed),
            Signal::new("AliveCounterACC", (idx % 0x10) as f64),
            Signal::new("ObjValid", lead),
            Signal::new("ACC_ObjStatus", lead),
            Signal::new("ACC_ObjLatPos", 0.0),
            Signal::new("ACC_ObjRelSpd", 0.0),
            Signal::new("ACC_ObjDist", 1.0),
        ],
    ));
    out.push(ctx.signals(
        FrameKind::Scc12,
        &[
            Signal::new("ACCMode", acc_mode),
            Signal::new("StopReq", flag(cmd.stopping)),
            Signal::new("aReqRaw", cmd.accel),
            Signal::new("aReqValue", cmd.accel),
            Signal::new("CR_VSM_Alive", (idx % 0xF) as f64),
        ],
    ));
    out.push(ctx.signals(
        FrameKind::Scc14,
        &[
            Signal::new("ComfortBandUpper", 0.0),
            Signal::new("ComfortBandLower", 0.0),
            Signal::new("JerkUpperLimit", cmd.jerk_upper),
            Signal::new("JerkLowerLimit", cmd.jerk_lower),
            // SCC14 reports standby as 4.
            Signal::new("ACCMode", if intent.enabled { acc_mode } else { 4.0 }),
            Signal::new("ObjGap", if intent.hud.lead_visible { 2.0 } else { 0.0 }),
        ],
    ));
}

/// Lane-following icon on the multi-function display.
pub fn lfahda_mfc(ctx: &FrameContext<'_>) -> OutboundMessage {
    ctx.signals(
        FrameKind::LfahdaMfc,
        &[Signal::new("LFA_Icon_State", if ctx.intent.enabled { 2.0 } else { 0.0 })],
    )
}

/// ACC option frames: SCC13, FCA12.
pub fn acc_options(ctx: &FrameContext<'_>, out: &mut Outbox) {
    out.push(ctx.signals(
        FrameKind::Scc13,
        &[
            Signal::new("SCCDrvModeRValue", 2.0),
            Signal::new("SCC_Equip", 1.0),
            Signal::new("Lead_Veh_Dep_Alert_USM", 2.0),
        ],
    ));
    out.push(ctx.signals(
        FrameKind::Fca12,
        &[Signal::new("FCA_DrvSetState", 2.0), Signal::new("FCA_USM", 1.0)],
    ));
}

pub fn frt_radar_options(ctx: &FrameContext<'_>) -> OutboundMessage {
    ctx.signals(FrameKind::FrtRadar11, &[Signal::new("CF_FCA_Equip_Front_Radar", 1.0)])
}

pub fn tester_present(ctx: &FrameContext<'_>) -> OutboundMessage {
    let data: Vec<u8, MAX_PAYLOAD> = Vec::from_slice(&TESTER_PRESENT_PAYLOAD).unwrap_or_default();
    ctx.message(FrameKind::TesterPresent, Payload::Raw(data))
}

// ─── Tests ──────────────────────────────────────────────────────────
