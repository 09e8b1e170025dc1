use radar_common::error::ScanError;
use radar_common::network::device::DeviceRecord;
use radar_common::scanning::{ScanStatus, StatusReport};

/// The status counters and device list of the one scan a session can run.
///
/// Every transition happens under the session lock, so readers always see
/// `devices.len() <= progress <= total`.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) status: ScanStatus,
    pub(crate) devices: Vec<DeviceRecord>,
}

impl SessionState {
    /// idle -> scanning. Leaves everything untouched when already scanning.
    pub(crate) fn begin(&mut self) -> Result<(), ScanError> {
        if self.status.scanning {
            return Err(ScanError::Busy);
        }
        self.status = ScanStatus {
            scanning: true,
            progress: 0,
            total: 0,
        };
        self.devices.clear();
        Ok(())
    }

    pub(crate) fn set_total(&mut self, total: usize) {
        self.status.total = total;
    }

    /// Accounts for one finished device task.
    pub(crate) fn complete(&mut self, record: Option<DeviceRecord>) {
        if let Some(record) = record {
            self.devices.push(record);
        }
        if self.status.progress < self.status.total {
            self.status.progress += 1;
        }
    }

    /// scanning -> idle.
    pub(crate) fn finish(&mut self) {
        self.status.scanning = false;
    }

    pub(crate) fn report(&self) -> StatusReport {
        StatusReport {
            status: self.status,
            devices: self.devices.len(),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
