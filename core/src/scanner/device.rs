use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use radar_common::config::ScanConfig;
use radar_common::network::device::DeviceRecord;
use radar_common::{debug, trace};

use super::ports::TcpPortScanner;
use super::probe::select_prober;
use super::resolver::{DnsResolver, NoResolver};
use super::{HostResolver, PortScanner, Prober};
use crate::classifier::classify;

/// Runs the per-host pipeline: liveness gate, then name lookup and port scan
/// side by side, then classification.
#[derive(Clone)]
pub struct DeviceScanner {
    prober: Arc<dyn Prober>,
    port_scanner: Arc<dyn PortScanner>,
    resolver: Arc<dyn HostResolver>,
    config: Arc<ScanConfig>,
}

impl DeviceScanner {
    pub fn new(
        prober: Arc<dyn Prober>,
        port_scanner: Arc<dyn PortScanner>,
        resolver: Arc<dyn HostResolver>,
        config: ScanConfig,
    ) -> Self {
        Self {
            prober,
            port_scanner,
            resolver,
            config: Arc::new(config),
        }
    }

    /// Wires up the stock implementations for `config`.
    pub fn from_config(config: ScanConfig) -> Self {
        let prober = select_prober(config.probe_method);
        let port_scanner = Arc::new(TcpPortScanner::new(config.port_concurrency));
        let resolver: Arc<dyn HostResolver> = if config.resolve_hostnames {
            Arc::new(DnsResolver::new(config.resolve_timeout))
        } else {
            Arc::new(NoResolver)
        };
        Self::new(prober, port_scanner, resolver, config)
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Returns a record only for hosts that pass the liveness probe.
    ///
    /// A panic inside the resolver or the port scanner is contained and turns
    /// into "no hostname" or "no open ports" respectively.
    pub async fn scan_device(&self, addr: Ipv4Addr) -> Option<DeviceRecord> {
        if !self.prober.is_alive(addr, self.config.probe_timeout).await {
            trace!("{addr} did not answer");
            return None;
        }

        let lookup = AssertUnwindSafe(self.resolver.resolve(addr)).catch_unwind();
        let scan = AssertUnwindSafe(self.port_scanner.scan_ports(
            addr,
            &self.config.ports,
            self.config.port_timeout,
        ))
        .catch_unwind();

        let (hostname, open_ports) = tokio::join!(lookup, scan);

        let hostname = hostname.unwrap_or_else(|_| {
            debug!("Hostname lookup for {addr} panicked");
            None
        });
        let open_ports: BTreeSet<u16> = open_ports.unwrap_or_else(|_| {
            debug!("Port scan of {addr} panicked");
            BTreeSet::new()
        });

        let device_type = classify(&open_ports);
        debug!("{addr} is up: {device_type}, ports {open_ports:?}");

        Some(DeviceRecord::online(addr, hostname, open_ports, device_type))
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
    use crate::scanner::ProbeOutcome;
    use async_trait::async_trait;
    use radar_common::network::device::{DeviceStatus, DeviceType, UNKNOWN_HOSTNAME};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FixedProber(bool);

    #[async_trait]
    impl Prober for FixedProber {
        async fn probe(&self, _addr: Ipv4Addr, _timeout: Duration) -> ProbeOutcome {
            if self.0 { ProbeOutcome::Reply } else { ProbeOutcome::Timeout }
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    #[derive(Default)]
    struct CountingScanner {
        calls: AtomicUsize,
        open: Vec<u16>,
    }

    #[async_trait]
    impl PortScanner for CountingScanner {
        async fn scan_ports(&self, _addr: Ipv4Addr, ports: &[u16], _t: Duration) -> BTreeSet<u16> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.open.iter().copied().filter(|p| ports.contains(p)).collect()
        }
    }

    struct PanickingScanner;

    #[async_trait]
    impl PortScanner for PanickingScanner {
        async fn scan_ports(&self, _addr: Ipv4Addr, _ports: &[u16], _t: Duration) -> BTreeSet<u16> {
            panic!("scanner exploded")
        }
    }

    struct NamedResolver(&'static str);

    #[async_trait]
    impl HostResolver for NamedResolver {
        async fn resolve(&self, _addr: Ipv4Addr) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    struct PanickingResolver;

    #[async_trait]
    impl HostResolver for PanickingResolver {
        async fn resolve(&self, _addr: Ipv4Addr) -> Option<String> {
            panic!("resolver exploded")
        }
    }

    #[tokio::test]
    async fn dead_host_is_never_port_scanned() {
        let scanner = Arc::new(CountingScanner::default());
        let device = DeviceScanner::new(
            Arc::new(FixedProber(false)),
            scanner.clone(),
            Arc::new(NoResolver),
            ScanConfig::default(),
        );

        assert!(device.scan_device(Ipv4Addr::new(10, 0, 0, 2)).await.is_none());
        assert_eq!(scanner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn live_host_gets_a_classified_record() {
        let scanner = Arc::new(CountingScanner {
            open: vec![80, 22],
            ..Default::default()
        });
        let device = DeviceScanner::new(
            Arc::new(FixedProber(true)),
            scanner.clone(),
            Arc::new(NamedResolver("nas.lan")),
            ScanConfig::default(),
        );

        let record = device.scan_device(Ipv4Addr::new(10, 0, 0, 1)).await.unwrap();
        assert_eq!(record.address, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(record.hostname, "nas.lan");
        assert_eq!(record.open_ports.iter().copied().collect::<Vec<_>>(), vec![22, 80]);
        assert_eq!(record.device_type, DeviceType::LinuxServer);
        assert_eq!(record.status, DeviceStatus::Online);
        assert_eq!(scanner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn collaborator_panics_degrade_to_defaults() {
        let device = DeviceScanner::new(
            Arc::new(FixedProber(true)),
            Arc::new(PanickingScanner),
            Arc::new(PanickingResolver),
            ScanConfig::default(),
        );

        let record = device.scan_device(Ipv4Addr::new(10, 0, 0, 1)).await.unwrap();
        assert_eq!(record.hostname, UNKNOWN_HOSTNAME);
        assert!(record.open_ports.is_empty());
        assert_eq!(record.device_type, DeviceType::Unknown);
    }

    #[tokio::test]
    async fn ports_outside_the_candidate_list_are_ignored() {
        let scanner = Arc::new(CountingScanner {
            open: vec![5900, 12345],
            ..Default::default()
        });
        let device = DeviceScanner::new(
            Arc::new(FixedProber(true)),
            scanner,
            Arc::new(NoResolver),
            ScanConfig::default().with_ports(vec![5900]),
        );

        let record = device.scan_device(Ipv4Addr::new(10, 0, 0, 1)).await.unwrap();
        assert_eq!(record.open_ports.iter().copied().collect::<Vec<_>>(), vec![5900]);
        assert_eq!(record.device_type, DeviceType::VncServer);
    }
}
