//! Shared building blocks for the radar workspace.
//!
//! * [`network`]: IPv4 subnet math, local subnet enumeration and the device model.
//! * [`scanning`]: the observable scan state (`ScanStatus`, `StatusReport`).
//! * [`config`]: engine and front-end settings.
//! * [`error`]: error enums shared across crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod network;
pub mod scanning;
pub mod utils;

#[doc(hidden)]
pub use tracing;
