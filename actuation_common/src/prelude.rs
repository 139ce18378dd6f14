//! Prelude module for common re-exports.
//!
//! ```rust
//! use actuation_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{DT_CTRL, MAX_MESSAGES_PER_TICK, TICK_RATE_HZ};

// ─── Controller Types ───────────────────────────────────────────────
pub use crate::controller::flags::{Capabilities, InputFlags};
pub use crate::controller::intent::{
    ActuatorIntent, ButtonIntent, HudIntent, LongControlState, VisualAlert,
};
pub use crate::controller::limits::{ButtonTuning, JerkTuning, Limits, Tuning};
pub use crate::controller::message::{
    EncodedFrame, FrameKind, OutboundMessage, Payload, Signal, SignalSet,
};
pub use crate::controller::snapshot::{StockFrames, VehicleStateSnapshot};
pub use crate::controller::state::{AppliedActuators, ControllerState, WindDownPhase};
pub use crate::controller::vehicle::{DialectKind, ResolvedVehicle, VehicleConfig};
