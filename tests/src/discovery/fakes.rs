//! Scripted collaborators for driving a [`ScanSession`] without a network.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use radar_common::config::ScanConfig;
use radar_common::network::interface::SubnetEnumerator;
use radar_core::discovery::ScanSession;
use radar_core::scanner::device::DeviceScanner;
use radar_core::scanner::resolver::NoResolver;
use radar_core::scanner::{HostResolver, PortScanner, ProbeOutcome, Prober};
use tokio::sync::Semaphore;

/// Answers for a fixed set of addresses, optionally after a gate opens.
#[derive(Default)]
pub struct ScriptedProber {
    alive: HashSet<Ipv4Addr>,
    panics_on: HashSet<Ipv4Addr>,
    gate: Option<Arc<Semaphore>>,
    pub calls: AtomicUsize,
}

impl ScriptedProber {
    pub fn alive(addrs: &[Ipv4Addr]) -> Self {
        Self {
            alive: addrs.iter().copied().collect(),
            ..Default::default()
        }
    }

    pub fn panicking_on(mut self, addr: Ipv4Addr) -> Self {
        self.panics_on.insert(addr);
        self
    }

    /// Every probe blocks until `gate` is closed.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, addr: Ipv4Addr, _timeout: Duration) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            let _ = gate.acquire().await;
        }
        if self.panics_on.contains(&addr) {
            panic!("probe of {addr} blew up");
        }
        if self.alive.contains(&addr) {
            ProbeOutcome::Reply
        } else {
            ProbeOutcome::Timeout
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Reports a fixed port set per address and remembers who was scanned.
#[derive(Default)]
pub struct ScriptedPorts {
    open: HashMap<Ipv4Addr, Vec<u16>>,
    pub scanned: Mutex<Vec<Ipv4Addr>>,
}

impl ScriptedPorts {
    pub fn with(mut self, addr: Ipv4Addr, ports: &[u16]) -> Self {
        self.open.insert(addr, ports.to_vec());
        self
    }
}

#[async_trait]
impl PortScanner for ScriptedPorts {
    async fn scan_ports(&self, addr: Ipv4Addr, ports: &[u16], _t: Duration) -> BTreeSet<u16> {
        self.scanned.lock().unwrap().push(addr);
        self.open
            .get(&addr)
            .map(|open| open.iter().copied().filter(|p| ports.contains(p)).collect())
            .unwrap_or_default()
    }
}

pub struct StaticNames(pub HashMap<Ipv4Addr, &'static str>);

#[async_trait]
impl HostResolver for StaticNames {
    async fn resolve(&self, addr: Ipv4Addr) -> Option<String> {
        self.0.get(&addr).map(|name| name.to_string())
    }
}

pub struct FixedSubnets(pub Vec<&'static str>);

impl SubnetEnumerator for FixedSubnets {
    fn enumerate_local_subnets(&self) -> BTreeSet<String> {
        self.0.iter().map(|s| s.to_string()).collect()
    }
}

pub fn session_with(
    prober: Arc<ScriptedProber>,
    ports: Arc<ScriptedPorts>,
    enumerated: Vec<&'static str>,
    host_concurrency: usize,
) -> ScanSession {
    let scanner = DeviceScanner::new(
        prober,
        ports,
        Arc::new(NoResolver),
        ScanConfig::default().with_host_concurrency(host_concurrency),
    );
    ScanSession::new(scanner, Arc::new(FixedSubnets(enumerated)))
}

/// Polls until `total` is known, i.e. the scan has started dispatching.
pub async fn wait_for_dispatch(session: &ScanSession) {
    for _ in 0..200 {
        if session.status().total > 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("scan never started dispatching");
}
