//! Duty-cycle schedule root.
//!
//! A dialect's static slot table is resolved once per session against the
//! vehicle capabilities; the tick loop then only evaluates periods.

pub mod dialect;
pub mod table;
