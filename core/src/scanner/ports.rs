use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use radar_common::trace;

use super::PortScanner;
use crate::network::tcp::{self, PortState};

pub const DEFAULT_PORT_CONCURRENCY: usize = 20;

/// Connect scan with a bounded number of attempts in flight per host.
#[derive(Debug, Clone)]
pub struct TcpPortScanner {
    concurrency: usize,
}

impl Default for TcpPortScanner {
    fn default() -> Self {
        Self::new(DEFAULT_PORT_CONCURRENCY)
    }
}

impl TcpPortScanner {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }
}

#[async_trait]
impl PortScanner for TcpPortScanner {
    async fn scan_ports(&self, addr: Ipv4Addr, ports: &[u16], per_port_timeout: Duration) -> BTreeSet<u16> {
        let open: BTreeSet<u16> = stream::iter(ports.iter().copied())
            .map(|port| async move { (port, tcp::connect_port(addr, port, per_port_timeout).await) })
            .buffer_unordered(self.concurrency)
            .filter_map(|(port, state)| async move { (state == PortState::Open).then_some(port) })
            .collect()
            .await;

        trace!("{addr}: {} of {} ports open", open.len(), ports.len());
        open
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
