//! Protocol dialects.
//!
//! Each variant carries the schedule resolved for the session and the
//! button policy it uses, so the tick never re-checks the vehicle.

use actuation_common::controller::flags::Capabilities;
use actuation_common::controller::message::FrameKind;
use actuation_common::controller::vehicle::{DialectKind, ResolvedVehicle};

use super::table::{EXTENDED_TABLE, LEGACY_TABLE, ScheduleTable, Slot};
use crate::buttons::ButtonPolicy;

#[derive(Debug, Clone, PartialEq)]
pub enum Dialect {
    Legacy {
        table: ScheduleTable,
        buttons: ButtonPolicy,
    },
    Extended {
        table: ScheduleTable,
        buttons: ButtonPolicy,
    },
}

impl Dialect {
    pub fn resolve(vehicle: &ResolvedVehicle) -> Self {
        let caps = vehicle.capabilities;
        let tuning = &vehicle.tuning.buttons;
        match vehicle.dialect {
            DialectKind::Legacy => Self::Legacy {
                table: ScheduleTable::resolve(&LEGACY_TABLE, caps),
                buttons: ButtonPolicy::legacy(tuning),
            },
            DialectKind::Extended => Self::Extended {
                table: ScheduleTable::resolve(&EXTENDED_TABLE, caps),
                buttons: ButtonPolicy::extended(tuning, caps.contains(Capabilities::ALT_BUTTONS)),
            },
        }
    }

    pub const fn kind(&self) -> DialectKind {
        match self {
            Self::Legacy { .. } => DialectKind::Legacy,
            Self::Extended { .. } => DialectKind::Extended,
        }
    }

    pub fn table(&self) -> &ScheduleTable {
        match self {
            Self::Legacy { table, .. } | Self::Extended { table, .. } => table,
        }
    }

    pub fn buttons(&self) -> &ButtonPolicy {
        match self {
            Self::Legacy { buttons, .. } | Self::Extended { buttons, .. } => buttons,
        }
    }

    /// Frame kinds a slot can emit in this dialect.
    pub fn slot_frames(&self, slot: Slot) -> &'static [FrameKind] {
        use FrameKind::*;
        match (self.kind(), slot) {
            (DialectKind::Legacy, Slot::Steering) => &[Lkas11],
            (DialectKind::Legacy, Slot::Buttons) => &[Clu11],
            (DialectKind::Legacy, Slot::AccelCommand) => &[Scc11, Scc12, Scc14],
            (DialectKind::Legacy, Slot::DisplayHud) => &[LfahdaMfc],
            (DialectKind::Legacy, Slot::AccOptions) => &[Scc13, Fca12],
            (DialectKind::Legacy, Slot::RadarOptions) => &[FrtRadar11],
            (DialectKind::Legacy, Slot::TesterPresent) => &[TesterPresent],
            (DialectKind::Extended, Slot::Steering) => &[FdLkas],
            (DialectKind::Extended, Slot::CameraBlock) => &[FdCameraBlock],
            (DialectKind::Extended, Slot::HudIcons) => &[FdLfahdaCluster],
            (DialectKind::Extended, Slot::Buttons) => match self.buttons() {
                ButtonPolicy::Extended { alt_buttons: true, .. } => &[FdCruiseInfo],
                _ => &[FdCruiseButtons],
            },
            _ => &[],
        }
    }

    /// Every frame kind this session can emit.
    pub fn frame_kinds(&self) -> impl Iterator<Item = FrameKind> + '_ {
        self.table()
            .entries()
            .iter()
            .flat_map(|e| self.slot_frames(e.slot).iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actuation_common::controller::limits::{Limits, Tuning};
    use actuation_common::controller::vehicle::RouteTable;

    fn vehicle(dialect: DialectKind, capabilities: Capabilities) -> ResolvedVehicle {
        ResolvedVehicle {
            model: "TEST",
            dialect,
            capabilities,
            depart_warning_code: 2,
            limits: Limits {
                steer_max: 384,
                steer_up_rate: 3,
                steer_down_rate: 7,
                driver_override_threshold: 50,
                accel_min: -3.5,
                accel_max: 2.0,
                steer_fraction_cap: 1.0,
            },
            tuning: Tuning::default(),
            routes: RouteTable::default(),
        }
    }

    #[test]
    fn legacy_own_long_kinds() {
        let d = Dialect::resolve(&vehicle(DialectKind::Legacy, Capabilities::OWN_LONGITUDINAL));
        assert_eq!(d.kind(), DialectKind::Legacy);
        let kinds: Vec<FrameKind> = d.frame_kinds().collect();
        assert_eq!(
            kinds,
            vec![
                FrameKind::Lkas11,
                FrameKind::Scc11,
                FrameKind::Scc12,
                FrameKind::Scc14,
                FrameKind::Scc13,
                FrameKind::Fca12,
                FrameKind::FrtRadar11,
                FrameKind::TesterPresent,
            ]
        );
    }

    #[test]
    fn alt_buttons_emit_cruise_info() {
        let d = Dialect::resolve(&vehicle(DialectKind::Extended, Capabilities::ALT_BUTTONS));
        assert!(matches!(d.buttons(), ButtonPolicy::Extended { alt_buttons: true, .. }));
        assert_eq!(d.slot_frames(Slot::Buttons), &[FrameKind::FdCruiseInfo]);
        assert!(d.frame_kinds().any(|k| k == FrameKind::FdLfahdaCluster));
    }

    #[test]
    fn primary_buttons_emit_button_frames() {
        let d = Dialect::resolve(&vehicle(DialectKind::Extended, Capabilities::HDA2));
        assert_eq!(d.slot_frames(Slot::Buttons), &[FrameKind::FdCruiseButtons]);
        assert!(d.frame_kinds().any(|k| k == FrameKind::FdCameraBlock));
        assert!(!d.frame_kinds().any(|k| k == FrameKind::FdLfahdaCluster));
    }
}
