//! Actuation Common Library
//!
//! Shared types, constants and configuration loading for the actuation
//! command layer workspace.
//!
//! # Module Structure
//!
//! - [`consts`] - Tick rate and fixed buffer capacities
//! - [`config`] - Configuration loading traits and types
//! - [`controller`] - Intents, snapshots, outbound messages, limits and
//!   per-session controller state
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```toml
//! [dependencies]
//! actuation_common = { path = "../actuation_common" }
//! ```
//!
//! ```rust
//! use actuation_common::prelude::*;
//! ```

pub mod config;
pub mod consts;
pub mod controller;
pub mod prelude;
