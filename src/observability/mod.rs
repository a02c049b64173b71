//! Observability helpers.
//!
//! The library only emits `tracing` events and spans; installing a
//! subscriber is left to the application.

mod logging;
mod tracing_utils;

pub use logging::*;
pub use tracing_utils::*;
