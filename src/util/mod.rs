//! Shared helpers for the scripts.

pub mod throttle;

pub use throttle::Throttle;
