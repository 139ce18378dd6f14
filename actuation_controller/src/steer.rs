//! Lateral command path.
//!
//! Steer fraction → integer command → wind-down override → rate limiter.

pub mod rate_limit;
pub mod wind_down;
