//! The per-host scanning **abstractions**.
//!
//! Each stage of a device scan sits behind a trait so the orchestration in
//! [`device`] and [`crate::discovery`] never depends on a concrete socket
//! strategy. Implementations recover from every transient network error on
//! their own and report plain values: a liveness verdict, a port set, or an
//! optional hostname.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;

pub mod device;
pub mod ports;
pub mod probe;
pub mod resolver;

/// What a single reachability probe observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The host answered.
    Reply,
    /// No answer arrived before the deadline.
    Timeout,
    /// The probe itself could not be carried out (permissions, missing tool, ...).
    Failed(String),
}

impl ProbeOutcome {
    pub fn is_alive(&self) -> bool {
        matches!(self, ProbeOutcome::Reply)
    }
}

/// Decides whether an address is live.
///
/// Implementations keep no per-call state and must tolerate hundreds of
/// concurrent calls; the caller bounds the fan-out.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, addr: Ipv4Addr, timeout: Duration) -> ProbeOutcome;

    /// Collapses [`Prober::probe`] into a verdict. Any failure means "not live".
    async fn is_alive(&self, addr: Ipv4Addr, timeout: Duration) -> bool {
        self.probe(addr, timeout).await.is_alive()
    }

    fn name(&self) -> &'static str;
}

/// Finds which of the candidate ports accept connections.
#[async_trait]
pub trait PortScanner: Send + Sync {
    /// Returns the open subset of `ports`, ascending and without duplicates.
    async fn scan_ports(&self, addr: Ipv4Addr, ports: &[u16], per_port_timeout: Duration) -> BTreeSet<u16>;
}

/// Best-effort reverse name lookup.
#[async_trait]
pub trait HostResolver: Send + Sync {
    async fn resolve(&self, addr: Ipv4Addr) -> Option<String>;
}
