//! # Device Model
//!
//! The record produced for every address that answered a reachability probe.

use std::collections::BTreeSet;
use std::fmt;
use std::net::Ipv4Addr;

use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};

pub const UNKNOWN_HOSTNAME: &str = "Unknown";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Coarse device category inferred from open ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    LinuxServer,
    WindowsComputer,
    LinuxWebServer,
    WindowsWebServer,
    WebServerOrRouter,
    NetworkDevice,
    VncServer,
    Unknown,
}

impl DeviceType {
    pub fn label(&self) -> &'static str {
        match self {
            DeviceType::LinuxServer => "Linux/Unix Server",
            DeviceType::WindowsComputer => "Windows Computer",
            DeviceType::LinuxWebServer => "Web Server (Linux)",
            DeviceType::WindowsWebServer => "Web Server (Windows)",
            DeviceType::WebServerOrRouter => "Web Server/Router",
            DeviceType::NetworkDevice => "Network Device/Router",
            DeviceType::VncServer => "VNC Server",
            DeviceType::Unknown => "Unknown Device",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for DeviceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
}

/// Everything learned about one live address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceRecord {
    #[serde(rename = "ip")]
    pub address: Ipv4Addr,
    pub hostname: String,
    pub open_ports: BTreeSet<u16>,
    pub device_type: DeviceType,
    #[serde(serialize_with = "serialize_timestamp")]
    pub last_seen: DateTime<Local>,
    pub status: DeviceStatus,
}

impl DeviceRecord {
    /// Builds a record for a host that just answered, stamped with the current time.
    pub fn online(
        address: Ipv4Addr,
        hostname: Option<String>,
        open_ports: BTreeSet<u16>,
        device_type: DeviceType,
    ) -> Self {
        Self {
            address,
            hostname: hostname.unwrap_or_else(|| UNKNOWN_HOSTNAME.to_string()),
            open_ports,
            device_type,
            last_seen: Local::now(),
            status: DeviceStatus::Online,
        }
    }

    pub fn has_hostname(&self) -> bool {
        self.hostname != UNKNOWN_HOSTNAME
    }
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Local>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
