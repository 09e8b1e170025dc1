//! # Radar Scan Engine
//!
//! Finds live hosts on IPv4 subnets and characterizes them.
//!
//! * [`scanner`]: per-host work (reachability, ports, reverse lookup) behind
//!   swappable traits, and the [`scanner::device::DeviceScanner`] that chains them.
//! * [`classifier`]: port signature to device category.
//! * [`discovery`]: the [`discovery::ScanSession`] that fans device scans out
//!   over whole subnets and tracks progress.
//! * [`network`]: socket-level helpers shared by the scanners.

pub mod classifier;
pub mod discovery;
pub mod network;
pub mod scanner;
