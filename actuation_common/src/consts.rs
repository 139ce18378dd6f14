//! System-wide constants for the actuation workspace.
//!
//! Single source of truth for the tick rate and every fixed capacity used
//! by the zero-allocation tick path.

use static_assertions::const_assert;

/// Control loop rate [Hz].
pub const TICK_RATE_HZ: u32 = 100;

/// Control tick period [s].
pub const DT_CTRL: f64 = 1.0 / TICK_RATE_HZ as f64;

/// Maximum number of signals carried by one symbolic frame.
pub const MAX_SIGNALS: usize = 24;

/// Maximum raw payload length (CAN-FD data field).
pub const MAX_PAYLOAD: usize = 64;

/// Upper bound for any configured button burst.
pub const MAX_BURST: usize = 32;

/// Maximum outbound messages assembled in one tick.
///
/// Worst case: steering + camera-block + HUD icons + one burst +
/// accel group (3) + display HUD + ACC options (2) + radar options +
/// tester present.
pub const MAX_MESSAGES_PER_TICK: usize = 48;

/// Frames produced by the legacy accel/jerk slot.
pub const ACCEL_GROUP_FRAMES: usize = 3;

/// Frames produced by the legacy ACC options slot.
pub const ACC_OPTION_FRAMES: usize = 2;

const_assert!(1 + 1 + 1 + MAX_BURST + ACCEL_GROUP_FRAMES + 1 + ACC_OPTION_FRAMES + 1 + 1 <= MAX_MESSAGES_PER_TICK);
