//! Port-signature heuristics.
//!
//! Rules are checked top to bottom and the first hit wins. The Linux branch
//! under the web rule can never fire because port 22 is claimed earlier; it
//! stays so that reordering the table keeps the layered fallback.

use std::collections::BTreeSet;

use radar_common::network::device::DeviceType;

const SSH: u16 = 22;
const TELNET: u16 = 23;
const HTTP: u16 = 80;
const MSRPC: u16 = 135;
const NETBIOS: u16 = 139;
const HTTPS: u16 = 443;
const SMB: u16 = 445;
const RDP: u16 = 3389;
const VNC: u16 = 5900;

pub fn classify(open_ports: &BTreeSet<u16>) -> DeviceType {
    let open = |port: u16| open_ports.contains(&port);

    if open(SSH) {
        DeviceType::LinuxServer
    } else if open(RDP) {
        DeviceType::WindowsComputer
    } else if open(HTTP) || open(HTTPS) {
        if open(SSH) {
            DeviceType::LinuxWebServer
        } else if open(MSRPC) {
            DeviceType::WindowsWebServer
        } else {
            DeviceType::WebServerOrRouter
        }
    } else if open(TELNET) {
        DeviceType::NetworkDevice
    } else if open(NETBIOS) || open(SMB) {
        DeviceType::WindowsComputer
    } else if open(VNC) {
        DeviceType::VncServer
    } else {
        DeviceType::Unknown
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
