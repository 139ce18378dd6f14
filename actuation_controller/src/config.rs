//! Vehicle configuration loader with session-level validation.
//!
//! Parses the TOML document, validates every section, resolves the vehicle
//! profile and checks that no two frames the session emits share an
//! address on the same bus.

use std::collections::BTreeMap;
use std::path::Path;

use actuation_common::config::{ConfigError, ConfigLoader, LogLevel};
use actuation_common::controller::message::FrameKind;
use actuation_common::controller::vehicle::{ResolvedVehicle, VehicleConfig};
use tracing::info;

use crate::schedule::dialect::Dialect;

// ─── Loaded Config Bundle ───────────────────────────────────────────

/// Validated configuration, ready for [`crate::session::init_session`].
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: VehicleConfig,
    pub vehicle: ResolvedVehicle,
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate a vehicle configuration file.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let config = VehicleConfig::load(path)?;
    let loaded = finish(config)?;
    info!(
        path = %path.display(),
        model = loaded.vehicle.model,
        dialect = ?loaded.vehicle.dialect,
        "Configuration loaded"
    );
    Ok(loaded)
}

/// Load config from a TOML string (for testing).
pub fn load_config_from_str(toml: &str) -> Result<LoadedConfig, ConfigError> {
    finish(VehicleConfig::from_toml(toml)?)
}

fn finish(config: VehicleConfig) -> Result<LoadedConfig, ConfigError> {
    let vehicle = config.resolve()?;
    validate_routes(&vehicle)?;
    Ok(LoadedConfig { config, vehicle })
}

/// Reject address collisions among the frames this session emits.
pub fn validate_routes(vehicle: &ResolvedVehicle) -> Result<(), ConfigError> {
    let dialect = Dialect::resolve(vehicle);
    let mut seen: BTreeMap<(u8, u32), FrameKind> = BTreeMap::new();
    for kind in dialect.frame_kinds() {
        let route = vehicle.routes.route(kind);
        if let Some(other) = seen.insert((route.bus, route.address), kind) {
            if other != kind {
                return Err(ConfigError::ValidationError(format!(
                    "messages.{} and messages.{} both use address {:#x} on bus {}",
                    other.name(),
                    kind.name(),
                    route.address,
                    route.bus
                )));
            }
        }
    }
    Ok(())
}

/// Filter directive for the run: `--verbose` overrides `shared.log_level`.
pub fn log_directive(configured: LogLevel, verbose: bool) -> &'static str {
    if verbose {
        LogLevel::Debug.as_directive()
    } else {
        configured.as_directive()
    }
}
