use std::str::FromStr;
use std::time::Duration;

/// Ports probed on every live host unless overridden.
pub const DEFAULT_PORTS: [u16; 14] = [
    22,   // SSH
    23,   // Telnet
    53,   // DNS
    80,   // HTTP
    135,  // MS RPC
    139,  // NetBIOS
    443,  // HTTPS
    445,  // SMB
    993,  // IMAPS
    995,  // POP3S
    1723, // PPTP
    3389, // RDP
    5900, // VNC
    8080, // HTTP-Proxy
];

/// Largest number of addresses a single scan will take on.
pub const DEFAULT_MAX_HOSTS: usize = 1 << 16;

/// How liveness is checked before a host is port scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeMethod {
    /// ICMP sockets when privileged, the system `ping` tool otherwise.
    #[default]
    Auto,
    /// ICMP echo over a raw or datagram socket.
    Icmp,
    /// Spawn the platform `ping` binary.
    SystemPing,
    /// TCP handshake against a few well-known ports.
    Tcp,
}

impl FromStr for ProbeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "icmp" => Ok(Self::Icmp),
            "ping" | "system" => Ok(Self::SystemPing),
            "tcp" => Ok(Self::Tcp),
            other => Err(format!(
                "unknown probe method '{other}' (expected auto, icmp, ping or tcp)"
            )),
        }
    }
}

/// Settings consumed by the scan engine.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Candidate ports tested on every live host.
    pub ports: Vec<u16>,
    /// Upper bound for a single reachability probe.
    pub probe_timeout: Duration,
    /// Upper bound for a single TCP connect attempt.
    pub port_timeout: Duration,
    /// Simultaneous connect attempts against one host.
    pub port_concurrency: usize,
    /// Simultaneous device scans across the whole run.
    pub host_concurrency: usize,
    /// Whether live hosts get a reverse lookup.
    pub resolve_hostnames: bool,
    /// Upper bound for a single reverse lookup.
    pub resolve_timeout: Duration,
    pub probe_method: ProbeMethod,
    /// Subnets that would push the target list past this many hosts are skipped.
    pub max_hosts: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ports: DEFAULT_PORTS.to_vec(),
            probe_timeout: Duration::from_millis(1_000),
            port_timeout: Duration::from_millis(500),
            port_concurrency: 20,
            host_concurrency: 50,
            resolve_hostnames: true,
            resolve_timeout: Duration::from_millis(2_000),
            probe_method: ProbeMethod::Auto,
            max_hosts: DEFAULT_MAX_HOSTS,
        }
    }
}

impl ScanConfig {
    pub fn with_ports(mut self, ports: Vec<u16>) -> Self {
        self.ports = ports;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_port_timeout(mut self, timeout: Duration) -> Self {
        self.port_timeout = timeout;
        self
    }

    pub fn with_port_concurrency(mut self, jobs: usize) -> Self {
        self.port_concurrency = jobs.max(1);
        self
    }

    pub fn with_host_concurrency(mut self, jobs: usize) -> Self {
        self.host_concurrency = jobs.max(1);
        self
    }

    pub fn with_hostname_resolution(mut self, enabled: bool) -> Self {
        self.resolve_hostnames = enabled;
        self
    }

    pub fn with_probe_method(mut self, method: ProbeMethod) -> Self {
        self.probe_method = method;
        self
    }

    pub fn with_max_hosts(mut self, hosts: usize) -> Self {
        self.max_hosts = hosts.max(1);
        self
    }
}

/// Front-end settings.
pub struct Config {
    /// Skips reverse lookups for discovered hosts.
    pub no_dns: bool,
    /// 0 prints everything, 1 drops decorations, 2 prints only the summary.
    pub quiet: u8,
    /// Prints the final device list as JSON instead of a tree.
    pub json: bool,
    /// Do not listen for the `q` key while a scan runs.
    pub disable_input: bool,
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
