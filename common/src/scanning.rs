//! # Scan State
//!
//! Snapshots of the single scan session, as exposed to pollers.

use serde::Serialize;

/// Progress of the current (or last) scan.
///
/// `progress` only grows while `scanning` is true and `total` is fixed once
/// the target list is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScanStatus {
    pub scanning: bool,
    pub progress: usize,
    pub total: usize,
}

impl ScanStatus {
    /// Share of targets completed, from 0 to 100.
    ///
    /// An empty target list reads as 0 while it is still being built and as
    /// 100 once the scan has finished.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return if self.scanning { 0.0 } else { 100.0 };
        }
        (self.progress as f64 / self.total as f64) * 100.0
    }
}

/// A status snapshot plus the number of devices found so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusReport {
    #[serde(flatten)]
    pub status: ScanStatus,
    pub devices: usize,
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
