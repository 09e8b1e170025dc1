//! Reachability probers and their selection at startup.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use radar_common::config::ProbeMethod;
use radar_common::{debug, warn};
use surge_ping::{Client, Config, PingIdentifier, PingSequence, SurgeError};

use super::{ProbeOutcome, Prober};
use crate::network::{ping, tcp};

const ICMP_PAYLOAD: [u8; 56] = [0; 56];

/// Ports tried by [`TcpProber`]; a reset on any of them proves liveness.
pub const LIVENESS_PORTS: [u16; 5] = [80, 443, 22, 445, 139];

/// ICMP echo over a socket owned by this process.
pub struct IcmpProber {
    client: Client,
}

impl IcmpProber {
    /// Opens the ICMP socket. Must run inside a tokio runtime.
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::new(&Config::default())?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for IcmpProber {
    async fn probe(&self, addr: Ipv4Addr, timeout: Duration) -> ProbeOutcome {
        let mut pinger = self
            .client
            .pinger(IpAddr::V4(addr), PingIdentifier(rand::random()))
            .await;
        pinger.timeout(timeout);

        match pinger.ping(PingSequence(0), &ICMP_PAYLOAD).await {
            Ok(_) => ProbeOutcome::Reply,
            Err(SurgeError::Timeout { .. }) => ProbeOutcome::Timeout,
            Err(e) => ProbeOutcome::Failed(e.to_string()),
        }
    }

    fn name(&self) -> &'static str {
        "icmp"
    }
}

/// Delegates to the platform `ping` binary. Works without privileges.
pub struct SystemPingProber;

#[async_trait]
impl Prober for SystemPingProber {
    async fn probe(&self, addr: Ipv4Addr, timeout: Duration) -> ProbeOutcome {
        ping::system_ping(addr, timeout).await
    }

    fn name(&self) -> &'static str {
        "system ping"
    }
}

/// Treats any TCP answer on a handful of common ports as proof of life.
pub struct TcpProber {
    ports: Vec<u16>,
}

impl Default for TcpProber {
    fn default() -> Self {
        Self {
            ports: LIVENESS_PORTS.to_vec(),
        }
    }
}

impl TcpProber {
    pub fn new(ports: Vec<u16>) -> Self {
        Self { ports }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, addr: Ipv4Addr, timeout: Duration) -> ProbeOutcome {
        let outcomes = join_all(
            self.ports
                .iter()
                .map(|&port| tcp::handshake_probe(addr, port, timeout)),
        )
        .await;

        if outcomes.iter().any(ProbeOutcome::is_alive) {
            return ProbeOutcome::Reply;
        }
        outcomes
            .into_iter()
            .find(|outcome| matches!(outcome, ProbeOutcome::Failed(_)))
            .unwrap_or(ProbeOutcome::Timeout)
    }

    fn name(&self) -> &'static str {
        "tcp handshake"
    }
}

/// Picks the prober for `method`.
///
/// `Auto` prefers ICMP when running as root. A failure to open the ICMP
/// socket degrades to the system `ping` tool.
pub fn select_prober(method: ProbeMethod) -> Arc<dyn Prober> {
    let prober: Arc<dyn Prober> = match method {
        ProbeMethod::Auto if is_root::is_root() => icmp_or_system_ping(),
        ProbeMethod::Auto | ProbeMethod::SystemPing => Arc::new(SystemPingProber),
        ProbeMethod::Icmp => icmp_or_system_ping(),
        ProbeMethod::Tcp => Arc::new(TcpProber::default()),
    };
    debug!("Reachability probe: {}", prober.name());
    prober
}

fn icmp_or_system_ping() -> Arc<dyn Prober> {
    match IcmpProber::new() {
        Ok(prober) => Arc::new(prober),
        Err(e) => {
            warn!("ICMP socket unavailable ({e}), falling back to the system ping tool");
            Arc::new(SystemPingProber)
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

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn tcp_prober_sees_loopback_listener() {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let prober = TcpProber::new(vec![port]);
        assert!(prober.is_alive(Ipv4Addr::LOCALHOST, Duration::from_millis(500)).await);
    }

    #[tokio::test]
    async fn tcp_prober_with_no_ports_is_not_alive() {
        let prober = TcpProber::new(Vec::new());
        let outcome = prober.probe(Ipv4Addr::LOCALHOST, Duration::from_millis(100)).await;
        assert_eq!(outcome, ProbeOutcome::Timeout);
    }

    #[tokio::test]
    async fn explicit_methods_select_matching_probers() {
        assert_eq!(select_prober(ProbeMethod::Tcp).name(), "tcp handshake");
        assert_eq!(select_prober(ProbeMethod::SystemPing).name(), "system ping");
    }

    #[tokio::test]
    async fn icmp_selection_always_yields_a_prober() {
        let name = select_prober(ProbeMethod::Icmp).name();
        assert!(name == "icmp" || name == "system ping");
    }

    #[tokio::test]
    #[ignore]
    async fn unroutable_address_is_not_alive() {
        let prober = select_prober(ProbeMethod::Auto);
        let ip = Ipv4Addr::new(203, 0, 113, 1);
        assert!(!prober.is_alive(ip, Duration::from_millis(500)).await);
    }
}
