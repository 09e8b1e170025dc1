//! # Local Subnet Enumeration
//!
//! Supplies the CIDR blocks a scan covers when the caller names no target.
//!
//! Resolution order:
//! 1. IPv4 networks bound to every up, non-loopback interface.
//! 2. The address the OS would use to reach the internet, widened to a `/24`.
//! 3. [`FALLBACK_SUBNETS`].

use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use pnet::datalink::{self, NetworkInterface};
use tracing::debug;

use crate::network::subnet::Subnet;
use crate::utils::interface::NetworkInterfaceExtension;

/// Conventional private ranges used when nothing can be detected.
pub const FALLBACK_SUBNETS: [&str; 3] = ["192.168.1.0/24", "192.168.0.0/24", "10.0.0.0/24"];

const ROUTE_PROBE_ADDR: (Ipv4Addr, u16) = (Ipv4Addr::new(8, 8, 8, 8), 80);
const ASSUMED_PREFIX: u8 = 24;

/// A source of candidate CIDR blocks.
///
/// Implementations must always yield at least one entry.
pub trait SubnetEnumerator: Send + Sync {
    fn enumerate_local_subnets(&self) -> BTreeSet<String>;
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    IsDown,
    /// The interface only loops back to this host.
    IsLoopback,
    /// The interface carries no IPv4 network worth sweeping.
    NoScannableIpv4,
}

/// Reads subnets from the host's network interfaces.
#[derive(Debug, Default, Clone, Copy)]
pub struct InterfaceSubnets;

impl SubnetEnumerator for InterfaceSubnets {
    fn enumerate_local_subnets(&self) -> BTreeSet<String> {
        let subnets = subnets_from_interfaces(&datalink::interfaces());
        if !subnets.is_empty() {
            return subnets;
        }

        debug!("No interface subnets found, asking the routing table for a source address");
        if let Some(subnet) = default_route_subnet() {
            return BTreeSet::from([subnet.to_string()]);
        }

        debug!("Could not determine a local address, using fallback subnets");
        fallback_subnets()
    }
}

/// Collects the networks of every viable interface, normalized to CIDR form.
pub fn subnets_from_interfaces(interfaces: &[NetworkInterface]) -> BTreeSet<String> {
    interfaces
        .iter()
        .filter(|interface| is_viable_interface(interface).is_ok())
        .flat_map(|interface| interface.get_scannable_ipv4_nets())
        .filter_map(|net| Subnet::new(net.ip(), net.prefix()).ok())
        .map(|subnet| subnet.to_string())
        .collect()
}

pub fn fallback_subnets() -> BTreeSet<String> {
    FALLBACK_SUBNETS.iter().map(|s| s.to_string()).collect()
}

fn is_viable_interface(interface: &NetworkInterface) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() {
        return Err(ViabilityError::IsLoopback);
    }
    if interface.get_scannable_ipv4_nets().is_empty() {
        return Err(ViabilityError::NoScannableIpv4);
    }
    Ok(())
}

/// Connecting a UDP socket sends nothing but makes the OS pick a source address.
fn default_route_subnet() -> Option<Subnet> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect(ROUTE_PROBE_ADDR).ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(local) if !local.is_loopback() && !local.is_unspecified() => {
            Subnet::new(local, ASSUMED_PREFIX).ok()
        }
        _ => None,
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
