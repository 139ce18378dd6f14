//! Vehicle configuration, profile registry and capability resolution.
//!
//! Per-vehicle branching happens exactly once, in [`VehicleConfig::resolve`]:
//! the model identifier selects a [`VehicleProfile`], the `[vehicle]` section
//! may override individual capabilities, and the result is a
//! [`ResolvedVehicle`] the scheduler reads for the rest of the session.
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! service_name = "actuation-sonata"
//!
//! [vehicle]
//! model = "HYUNDAI_SONATA"
//! own_longitudinal = true
//!
//! [limits]
//! steer_max = 384
//! steer_up_rate = 3
//! steer_down_rate = 7
//! driver_override_threshold = 50
//! accel_min = -3.5
//! accel_max = 2.0
//!
//! [messages.LKAS11]
//! address = 832
//! bus = 0
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::flags::Capabilities;
use super::limits::{Limits, Tuning};
use super::message::{FRAME_KIND_COUNT, FrameKind};
use crate::config::{ConfigError, SharedConfig};

/// Protocol family spoken by the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// Classic CAN message set.
    Legacy,
    /// CAN-FD message set.
    Extended,
}

/// Built-in defaults for one vehicle model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleProfile {
    pub model: &'static str,
    pub dialect: DialectKind,
    pub capabilities: Capabilities,
    /// Code the cluster expects for an active lane-departure warning.
    pub depart_warning_code: u8,
    pub steer_fraction_cap: f64,
}

const fn legacy(model: &'static str, capabilities: Capabilities) -> VehicleProfile {
    VehicleProfile {
        model,
        dialect: DialectKind::Legacy,
        capabilities,
        depart_warning_code: 2,
        steer_fraction_cap: 1.0,
    }
}

const fn extended(model: &'static str, capabilities: Capabilities) -> VehicleProfile {
    VehicleProfile {
        model,
        dialect: DialectKind::Extended,
        capabilities,
        depart_warning_code: 2,
        steer_fraction_cap: 1.0,
    }
}

const NONE: Capabilities = Capabilities::empty();
const LFA: Capabilities = Capabilities::LFA_DISPLAY;

/// Profile registry.
pub const PROFILES: &[VehicleProfile] = &[
    legacy("HYUNDAI_SONATA", LFA),
    legacy("HYUNDAI_SONATA_HYBRID", LFA),
    legacy("HYUNDAI_PALISADE", LFA),
    legacy("HYUNDAI_ELANTRA_2021", LFA),
    legacy("HYUNDAI_IONIQ", LFA),
    legacy("HYUNDAI_SANTA_FE_2022", LFA),
    legacy("HYUNDAI_ELANTRA", NONE),
    legacy("HYUNDAI_SANTA_FE", NONE),
    VehicleProfile {
        steer_fraction_cap: 0.7,
        ..legacy("HYUNDAI_KONA", NONE)
    },
    VehicleProfile {
        steer_fraction_cap: 0.7,
        ..legacy("HYUNDAI_KONA_EV", LFA)
    },
    legacy("KIA_NIRO_EV", LFA),
    legacy("KIA_SELTOS", LFA),
    legacy("KIA_STINGER", NONE),
    VehicleProfile {
        depart_warning_code: 1,
        ..legacy("GENESIS_G80", NONE)
    },
    VehicleProfile {
        depart_warning_code: 1,
        ..legacy("GENESIS_G90", NONE)
    },
    legacy("GENESIS_G70_2020", LFA),
    extended("HYUNDAI_IONIQ_5", Capabilities::HDA2),
    extended("KIA_EV6", Capabilities::HDA2),
    extended("HYUNDAI_TUCSON_4TH_GEN", NONE),
    extended("KIA_SORENTO_4TH_GEN", Capabilities::ALT_BUTTONS),
];

/// Look up a model in the registry (case-insensitive).
pub fn find_profile(model: &str) -> Option<&'static VehicleProfile> {
    PROFILES.iter().find(|p| p.model.eq_ignore_ascii_case(model))
}

/// `[vehicle]` section: model selection and capability overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSection {
    pub model: String,
    /// Stack owns longitudinal control (legacy dialect only).
    #[serde(default)]
    pub own_longitudinal: bool,
    #[serde(default)]
    pub hda2: Option<bool>,
    #[serde(default)]
    pub alt_buttons: Option<bool>,
    #[serde(default)]
    pub lfa_display: Option<bool>,
    #[serde(default)]
    pub depart_warning_code: Option<u8>,
}

/// Address and bus of one outbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRoute {
    pub address: u32,
    #[serde(default)]
    pub bus: u8,
}

impl FrameRoute {
    pub const fn new(address: u32, bus: u8) -> Self {
        Self { address, bus }
    }
}

/// Default route for every frame kind.
pub const fn default_route(kind: FrameKind) -> FrameRoute {
    match kind {
        FrameKind::Lkas11 => FrameRoute::new(0x340, 0),
        FrameKind::Clu11 => FrameRoute::new(0x4F1, 0),
        FrameKind::Scc11 => FrameRoute::new(0x420, 0),
        FrameKind::Scc12 => FrameRoute::new(0x421, 0),
        FrameKind::Scc13 => FrameRoute::new(0x50A, 0),
        FrameKind::Scc14 => FrameRoute::new(0x389, 0),
        FrameKind::Fca12 => FrameRoute::new(0x483, 0),
        FrameKind::FrtRadar11 => FrameRoute::new(0x4A2, 0),
        FrameKind::LfahdaMfc => FrameRoute::new(0x485, 0),
        FrameKind::TesterPresent => FrameRoute::new(0x7D0, 0),
        FrameKind::FdLkas => FrameRoute::new(0x050, 4),
        FrameKind::FdCameraBlock => FrameRoute::new(0x2A4, 4),
        FrameKind::FdLfahdaCluster => FrameRoute::new(0x1E0, 4),
        FrameKind::FdCruiseButtons => FrameRoute::new(0x1CF, 5),
        FrameKind::FdCruiseInfo => FrameRoute::new(0x1A0, 4),
    }
}

/// Resolved address table indexed by [`FrameKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteTable {
    routes: [FrameRoute; FRAME_KIND_COUNT],
}

impl Default for RouteTable {
    fn default() -> Self {
        let mut routes = [FrameRoute::new(0, 0); FRAME_KIND_COUNT];
        for kind in FrameKind::ALL {
            routes[kind as usize] = default_route(kind);
        }
        Self { routes }
    }
}

impl RouteTable {
    #[inline]
    pub fn route(&self, kind: FrameKind) -> FrameRoute {
        self.routes[kind as usize]
    }

    /// Apply `[messages.<NAME>]` overrides.
    pub fn with_overrides(overrides: &BTreeMap<String, FrameRoute>) -> Result<Self, ConfigError> {
        let mut table = Self::default();
        for (name, route) in overrides {
            let kind = FrameKind::ALL
                .into_iter()
                .find(|k| k.name() == name)
                .ok_or_else(|| {
                    ConfigError::ValidationError(format!("messages.{name}: unknown frame"))
                })?;
            if route.address > 0x1FFF_FFFF {
                return Err(ConfigError::ValidationError(format!(
                    "messages.{name}: address {:#x} exceeds 29 bits",
                    route.address
                )));
            }
            table.routes[kind as usize] = *route;
        }
        Ok(table)
    }
}

/// Complete vehicle configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleConfig {
    pub shared: SharedConfig,
    pub vehicle: VehicleSection,
    pub limits: Limits,
    #[serde(default)]
    pub tuning: Tuning,
    #[serde(default)]
    pub messages: BTreeMap<String, FrameRoute>,
}

/// Session-ready vehicle description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedVehicle {
    pub model: &'static str,
    pub dialect: DialectKind,
    pub capabilities: Capabilities,
    pub depart_warning_code: u8,
    pub limits: Limits,
    pub tuning: Tuning,
    pub routes: RouteTable,
}

impl VehicleConfig {
    /// Validate every section without resolving.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.limits.validate()?;
        self.tuning.validate()?;
        RouteTable::with_overrides(&self.messages)?;
        Ok(())
    }

    /// Resolve the model profile, apply overrides and check consistency.
    pub fn resolve(&self) -> Result<ResolvedVehicle, ConfigError> {
        self.validate()?;

        let profile = find_profile(&self.vehicle.model)
            .ok_or_else(|| ConfigError::UnknownVehicle(self.vehicle.model.clone()))?;

        let v = &self.vehicle;
        let mut caps = profile.capabilities;
        caps.set(Capabilities::OWN_LONGITUDINAL, v.own_longitudinal);
        if let Some(on) = v.hda2 {
            caps.set(Capabilities::HDA2, on);
        }
        if let Some(on) = v.alt_buttons {
            caps.set(Capabilities::ALT_BUTTONS, on);
        }
        if let Some(on) = v.lfa_display {
            caps.set(Capabilities::LFA_DISPLAY, on);
        }

        match profile.dialect {
            DialectKind::Legacy => {
                if caps.intersects(Capabilities::HDA2 | Capabilities::ALT_BUTTONS) {
                    return Err(ConfigError::ValidationError(format!(
                        "{}: hda2/alt_buttons require the extended dialect",
                        profile.model
                    )));
                }
            }
            DialectKind::Extended => {
                if caps.intersects(Capabilities::OWN_LONGITUDINAL | Capabilities::LFA_DISPLAY) {
                    return Err(ConfigError::ValidationError(format!(
                        "{}: own_longitudinal/lfa_display require the legacy dialect",
                        profile.model
                    )));
                }
            }
        }

        let depart_warning_code = v.depart_warning_code.unwrap_or(profile.depart_warning_code);
        if !(1..=3).contains(&depart_warning_code) {
            return Err(ConfigError::ValidationError(format!(
                "vehicle.depart_warning_code {depart_warning_code} out of range [1, 3]"
            )));
        }

        let mut limits = self.limits;
        limits.steer_fraction_cap = limits.steer_fraction_cap.min(profile.steer_fraction_cap);

        Ok(ResolvedVehicle {
            model: profile.model,
            dialect: profile.dialect,
            capabilities: caps,
            depart_warning_code,
            limits,
            tuning: self.tuning,
            routes: RouteTable::with_overrides(&self.messages)?,
        })
    }
}
