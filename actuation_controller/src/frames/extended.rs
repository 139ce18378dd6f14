//! CAN-FD frame builders.

use actuation_common::controller::message::{FrameKind, OutboundMessage, Signal};

use super::{FrameContext, flag};
use crate::buttons::CruiseButton;

pub fn lkas(ctx: &FrameContext<'_>, apply_steer: i32) -> OutboundMessage {
    let intent = ctx.intent;
    ctx.signals(
        FrameKind::FdLkas,
        &[
            Signal::new("LKA_MODE", 2.0),
            Signal::new("LKA_ICON", if intent.enabled { 2.0 } else { 1.0 }),
            Signal::new("TORQUE_REQUEST", f64::from(apply_steer)),
            Signal::new("STEER_REQ", flag(intent.lat_active)),
            Signal::new("LKA_ASSIST", 0.0),
        ],
    )
}

/// Stock camera frame with the lane-following block cleared, so the
/// camera's own lane-following stays off on HDA2 vehicles.
pub fn camera_block(ctx: &FrameContext<'_>) -> OutboundMessage {
    ctx.overlay(
        FrameKind::FdCameraBlock,
        &ctx.snapshot.stock.camera_block,
        &[Signal::new("BYTE7", 0.0)],
    )
}

pub fn lfahda_cluster(ctx: &FrameContext<'_>) -> OutboundMessage {
    let enabled = ctx.intent.enabled;
    ctx.signals(
        FrameKind::FdLfahdaCluster,
        &[
            Signal::new("HDA_ICON", flag(enabled)),
            Signal::new("LFA_ICON", if enabled { 2.0 } else { 0.0 }),
        ],
    )
}

pub fn cruise_buttons(ctx: &FrameContext<'_>, button: CruiseButton, counter: u8) -> OutboundMessage {
    ctx.signals(
        FrameKind::FdCruiseButtons,
        &[
            Signal::new("COUNTER", f64::from(counter)),
            Signal::new("SET_ME_1", 1.0),
            Signal::new("CRUISE_BUTTONS", f64::from(button.code())),
        ],
    )
}

/// Stock cruise-info copy reporting cruise as inactive.
pub fn cruise_info_cancel(ctx: &FrameContext<'_>) -> OutboundMessage {
    ctx.overlay(
        FrameKind::FdCruiseInfo,
        &ctx.snapshot.stock.cruise_info,
        &[Signal::new("CRUISE_STATUS", 0.0), Signal::new("CRUISE_INACTIVE", 1.0)],
    )
}
