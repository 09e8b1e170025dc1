//! # Subnet Model
//!
//! Parses and expands the IPv4 ranges a scan covers.
//!
//! Accepted notations:
//! * CIDR with a prefix length (`192.168.1.0/24`).
//! * CIDR with a dotted netmask (`192.168.1.0/255.255.255.0`).
//! * A bare address, treated as `/32`.
//!
//! Host bits are ignored, so `192.168.1.77/24` is the same subnet as
//! `192.168.1.0/24`.

use std::collections::HashSet;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use pnet::ipnetwork::{Ipv4Network, ipv4_mask_to_prefix};
use tracing::debug;

use crate::error::SubnetError;
use crate::network::range::Ipv4Range;

/// A validated IPv4 CIDR block, normalized to its network address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet {
    network: Ipv4Network,
}

impl Subnet {
    pub fn new(addr: Ipv4Addr, prefix: u8) -> Result<Self, SubnetError> {
        let input = format!("{addr}/{prefix}");
        let masked = Ipv4Network::new(addr, prefix).map_err(|e| SubnetError::malformed(&input, e))?;
        let network = Ipv4Network::new(masked.network(), prefix)
            .map_err(|e| SubnetError::malformed(&input, e))?;
        Ok(Self { network })
    }

    pub fn network(&self) -> Ipv4Addr {
        self.network.network()
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        self.network.broadcast()
    }

    pub fn prefix(&self) -> u8 {
        self.network.prefix()
    }

    /// Number of addresses in the block, network and broadcast included.
    pub fn size(&self) -> u64 {
        1u64 << (32 - u32::from(self.prefix()))
    }

    pub fn full_range(&self) -> Ipv4Range {
        Ipv4Range::new(self.network(), self.broadcast())
    }

    /// The scannable part of the block.
    ///
    /// Blocks with more than two addresses lose their network and broadcast
    /// addresses; `/31` and `/32` keep every address.
    pub fn host_range(&self) -> Ipv4Range {
        if self.size() <= 2 {
            return self.full_range();
        }
        let start = u32::from(self.network()).saturating_add(1);
        let end = u32::from(self.broadcast()).saturating_sub(1);
        Ipv4Range::new(Ipv4Addr::from(start), Ipv4Addr::from(end))
    }

    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> + use<> {
        self.host_range().to_iter()
    }

    pub fn host_count(&self) -> usize {
        self.host_range().len()
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix())
    }
}

impl FromStr for Subnet {
    type Err = SubnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (addr_str, prefix_str) = match s.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (s, None),
        };

        if addr_str.contains(':') {
            return Err(SubnetError::Ipv6Unsupported(s.to_string()));
        }

        let addr = addr_str
            .parse::<Ipv4Addr>()
            .map_err(|e| SubnetError::malformed(s, e))?;

        let prefix = match prefix_str {
            Some(prefix_str) => parse_prefix(prefix_str).map_err(|e| SubnetError::malformed(s, e))?,
            None => 32,
        };

        Self::new(addr, prefix)
    }
}

/// Accepts either a prefix length (`24`) or a dotted netmask (`255.255.255.0`).
fn parse_prefix(prefix_str: &str) -> Result<u8, String> {
    if let Ok(prefix) = prefix_str.parse::<u8>() {
        if prefix > 32 {
            return Err(format!("prefix {prefix} is larger than 32"));
        }
        return Ok(prefix);
    }

    let mask = prefix_str
        .parse::<Ipv4Addr>()
        .map_err(|_| format!("'{prefix_str}' is neither a prefix length nor a netmask"))?;
    ipv4_mask_to_prefix(mask).map_err(|e| e.to_string())
}

/// Parses every entry, dropping the ones that are not IPv4 subnets.
pub fn parse_subnets<I, S>(inputs: I) -> Vec<Subnet>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    inputs
        .into_iter()
        .filter_map(|input| match input.as_ref().parse::<Subnet>() {
            Ok(subnet) => Some(subnet),
            Err(e) => {
                debug!("Skipping target: {e}");
                None
            }
        })
        .collect()
}

/// Flattens subnets into their host addresses.
///
/// Addresses shared by overlapping subnets appear once, at their first position.
pub fn expand_hosts(subnets: &[Subnet]) -> Vec<Ipv4Addr> {
    let mut seen: HashSet<Ipv4Addr> = HashSet::new();
    subnets
        .iter()
        .flat_map(Subnet::hosts)
        .filter(|addr| seen.insert(*addr))
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
