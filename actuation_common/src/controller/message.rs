//! Outbound message shapes.
//!
//! The core never packs bytes for symbolic frames: it hands the signal
//! encoder a [`FrameKind`] plus named [`Signal`] values and the encoder
//! resolves them against the per-vehicle signal dictionary. Raw payloads are
//! used only for frames with no dictionary entry (tester present).

use heapless::Vec;
use serde::Serialize;

use crate::consts::{MAX_PAYLOAD, MAX_SIGNALS};

/// One named signal value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Signal {
    pub name: &'static str,
    pub value: f64,
}

impl Signal {
    #[inline]
    pub const fn new(name: &'static str, value: f64) -> Self {
        Self { name, value }
    }
}

/// Bounded set of named signals, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SignalSet {
    signals: Vec<Signal, MAX_SIGNALS>,
}

impl SignalSet {
    pub const fn new() -> Self {
        Self { signals: Vec::new() }
    }

    /// Build a set from a slice, keeping the first `MAX_SIGNALS` entries.
    pub fn from_slice(signals: &[Signal]) -> Self {
        let mut set = Self::new();
        for s in signals {
            if !set.insert(*s) {
                break;
            }
        }
        set
    }

    /// Overlay `overrides` on top of `base`.
    ///
    /// Overrides are placed first so they survive when the union exceeds
    /// capacity; base signals that are overridden or do not fit are dropped.
    pub fn overlay(base: &SignalSet, overrides: &[Signal]) -> Self {
        let mut set = Self::from_slice(overrides);
        for s in base.iter() {
            if set.get(s.name).is_some() {
                continue;
            }
            if !set.insert(*s) {
                break;
            }
        }
        set
    }

    /// Replace the value of `name` or append it. Returns `false` if full.
    pub fn insert(&mut self, signal: Signal) -> bool {
        if let Some(existing) = self.signals.iter_mut().find(|s| s.name == signal.name) {
            existing.value = signal.value;
            return true;
        }
        self.signals.push(signal).is_ok()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.signals.iter().find(|s| s.name == name).map(|s| s.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

/// Frame payload handed to the transport side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Payload {
    /// Pre-packed bytes, sent verbatim.
    Raw(Vec<u8, MAX_PAYLOAD>),
    /// Named signal values for the external encoder.
    Signals(SignalSet),
}

/// Every frame the scheduler can emit.
///
/// `Legacy*` kinds belong to the classic CAN dialect, `Fd*` kinds to the
/// extended (CAN-FD) dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FrameKind {
    Lkas11,
    Clu11,
    Scc11,
    Scc12,
    Scc13,
    Scc14,
    Fca12,
    FrtRadar11,
    LfahdaMfc,
    TesterPresent,
    FdLkas,
    FdCameraBlock,
    FdLfahdaCluster,
    FdCruiseButtons,
    FdCruiseInfo,
}

/// Number of [`FrameKind`] variants.
pub const FRAME_KIND_COUNT: usize = 15;

impl FrameKind {
    pub const ALL: [FrameKind; FRAME_KIND_COUNT] = [
        Self::Lkas11,
        Self::Clu11,
        Self::Scc11,
        Self::Scc12,
        Self::Scc13,
        Self::Scc14,
        Self::Fca12,
        Self::FrtRadar11,
        Self::LfahdaMfc,
        Self::TesterPresent,
        Self::FdLkas,
        Self::FdCameraBlock,
        Self::FdLfahdaCluster,
        Self::FdCruiseButtons,
        Self::FdCruiseInfo,
    ];

    /// Message name in the vehicle signal dictionary.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Lkas11 => "LKAS11",
            Self::Clu11 => "CLU11",
            Self::Scc11 => "SCC11",
            Self::Scc12 => "SCC12",
            Self::Scc13 => "SCC13",
            Self::Scc14 => "SCC14",
            Self::Fca12 => "FCA12",
            Self::FrtRadar11 => "FRT_RADAR11",
            Self::LfahdaMfc => "LFAHDA_MFC",
            Self::TesterPresent => "TESTER_PRESENT",
            Self::FdLkas => "LKAS",
            Self::FdCameraBlock => "CAM_0x2a4",
            Self::FdLfahdaCluster => "LFAHDA_CLUSTER",
            Self::FdCruiseButtons => "CRUISE_BUTTONS",
            Self::FdCruiseInfo => "SCC_CONTROL",
        }
    }

    /// Signals this layer writes into the frame.
    ///
    /// Pass-through frames may carry additional stock signals; those came
    /// from the same dictionary and are not listed here.
    pub const fn signals(&self) -> &'static [&'static str] {
        match self {
            Self::Lkas11 => &[
                "CF_Lkas_LdwsSysState",
                "CF_Lkas_SysWarning",
                "CF_Lkas_LdwsLHWarning",
                "CF_Lkas_LdwsRHWarning",
                "CR_Lkas_StrToqReq",
                "CF_Lkas_ActToi",
                "CF_Lkas_ToiFlt",
                "CF_Lkas_MsgCount",
                "CF_Lkas_LdwsActivemode",
                "CF_Lkas_LdwsOpt_USM",
                "CF_Lkas_FcwOpt_USM",
            ],
            Self::Clu11 => &["CF_Clu_CruiseSwState", "CF_Clu_AliveCnt1"],
            Self::Scc11 => &[
                "MainMode_ACC",
                "TauGapSet",
                "VSetDis",
                "AliveCounterACC",
                "ObjValid",
                "ACC_ObjStatus",
                "ACC_ObjLatPos",
                "ACC_ObjRelSpd",
                "ACC_ObjDist",
            ],
            Self::Scc12 => &["ACCMode", "aReqRaw", "aReqValue", "StopReq", "CR_VSM_Alive"],
            Self::Scc13 => &["SCCDrvModeRValue", "SCC_Equip", "Lead_Veh_Dep_Alert_USM"],
            Self::Scc14 => &[
                "ComfortBandUpper",
                "ComfortBandLower",
                "JerkUpperLimit",
                "JerkLowerLimit",
                "ACCMode",
                "ObjGap",
            ],
            Self::Fca12 => &["FCA_DrvSetState", "FCA_USM"],
            Self::FrtRadar11 => &["CF_FCA_Equip_Front_Radar"],
            Self::LfahdaMfc => &["LFA_Icon_State"],
            Self::TesterPresent => &[],
            Self::FdLkas => &["LKA_MODE", "LKA_ICON", "TORQUE_REQUEST", "STEER_REQ", "LKA_ASSIST"],
            Self::FdCameraBlock => &["BYTE7"],
            Self::FdLfahdaCluster => &["HDA_ICON", "LFA_ICON"],
            Self::FdCruiseButtons => &["COUNTER", "SET_ME_1", "CRUISE_BUTTONS"],
            Self::FdCruiseInfo => &["CRUISE_STATUS", "CRUISE_INACTIVE"],
        }
    }
}

/// One outbound bus frame request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    pub kind: FrameKind,
    pub address: u32,
    pub bus: u8,
    pub payload: Payload,
}

impl OutboundMessage {
    /// Signal value lookup for symbolic frames.
    pub fn signal(&self, name: &str) -> Option<f64> {
        match &self.payload {
            Payload::Signals(set) => set.get(name),
            Payload::Raw(_) => None,
        }
    }
}

/// A frame after signal encoding, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedFrame {
    pub address: u32,
    pub bus: u8,
    pub data: Vec<u8, MAX_PAYLOAD>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_existing_value() {
        let mut set = SignalSet::new();
        assert!(set.insert(Signal::new("A", 1.0)));
        assert!(set.insert(Signal::new("A", 2.0)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("A"), Some(2.0));
    }

    #[test]
    fn overlay_keeps_overrides_when_base_is_full() {
        const NAMES: [&str; MAX_SIGNALS] = [
            "S0", "S1", "S2", "S3", "S4", "S5", "S6", "S7", "S8", "S9", "S10", "S11", "S12",
            "S13", "S14", "S15", "S16", "S17", "S18", "S19", "S20", "S21", "S22", "S23",
        ];
        let mut base = SignalSet::new();
        for name in NAMES {
            assert!(base.insert(Signal::new(name, 0.0)));
        }
        assert!(!base.insert(Signal::new("EXTRA", 0.0)));

        let merged = SignalSet::overlay(&base, &[Signal::new("TORQUE", 42.0), Signal::new("S3", 7.0)]);
        assert_eq!(merged.len(), MAX_SIGNALS);
        assert_eq!(merged.get("TORQUE"), Some(42.0));
        assert_eq!(merged.get("S3"), Some(7.0));
    }

    #[test]
    fn frame_names_are_unique() {
        for (i, a) in FrameKind::ALL.iter().enumerate() {
            for b in &FrameKind::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }

    #[test]
    fn raw_frame_has_no_signals() {
        let mut data = Vec::new();
        data.push(0x02).unwrap();
        let msg = OutboundMessage {
            kind: FrameKind::TesterPresent,
            address: 0x7D0,
            bus: 0,
            payload: Payload::Raw(data),
        };
        assert_eq!(msg.signal("anything"), None);
        assert!(FrameKind::TesterPresent.signals().is_empty());
    }
}
