use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use async_trait::async_trait;
use dns_lookup::lookup_addr;
use radar_common::trace;
use tokio::time::timeout;

use super::HostResolver;

pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_millis(2_000);

/// Reverse lookup through the system resolver (`getnameinfo`).
///
/// The call blocks, so it runs on tokio's blocking pool under a deadline.
#[derive(Debug, Clone)]
pub struct DnsResolver {
    timeout: Duration,
}

impl Default for DnsResolver {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLVE_TIMEOUT)
    }
}

impl DnsResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl HostResolver for DnsResolver {
    async fn resolve(&self, addr: Ipv4Addr) -> Option<String> {
        let lookup = tokio::task::spawn_blocking(move || lookup_addr(&IpAddr::V4(addr)));

        match timeout(self.timeout, lookup).await {
            Ok(Ok(Ok(hostname))) => to_hostname(addr, hostname),
            Ok(Ok(Err(e))) => {
                trace!("Reverse lookup for {addr} failed: {e}");
                None
            }
            Ok(Err(e)) => {
                trace!("Reverse lookup task for {addr} died: {e}");
                None
            }
            Err(_elapsed) => {
                trace!("Reverse lookup for {addr} timed out");
                None
            }
        }
    }
}

/// Used when hostname resolution is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

#[async_trait]
impl HostResolver for NoResolver {
    async fn resolve(&self, _addr: Ipv4Addr) -> Option<String> {
        None
    }
}

/// `getnameinfo` echoes the numeric address back when no PTR record exists.
fn to_hostname(addr: Ipv4Addr, hostname: String) -> Option<String> {
    let hostname = hostname.trim_end_matches('.');
    if hostname.is_empty() || hostname == addr.to_string() {
        None
    } else {
        Some(hostname.to_string())
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
