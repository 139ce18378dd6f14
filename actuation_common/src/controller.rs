//! Actuation controller shared types.
//!
//! Everything exchanged between the tick scheduler and its host lives here:
//! per-tick intents and sensed state, outbound message shapes, vehicle limits
//! and tuning, capability flags, and the persistent controller state.

pub mod flags;
pub mod intent;
pub mod limits;
pub mod message;
pub mod snapshot;
pub mod state;
pub mod vehicle;
