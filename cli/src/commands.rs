pub mod networks;
pub mod scan;

use clap::{Args, Parser, Subcommand};
use radar_common::config::ProbeMethod;

#[derive(Parser)]
#[command(name = "radar")]
#[command(version, about = "Find and fingerprint live hosts on your local networks.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Skip reverse DNS lookups
    #[arg(long, global = true)]
    pub no_dns: bool,

    /// Less output (-q hides decorations, -qq prints only the summary)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Do not listen for 'q' on the keyboard
    #[arg(long, global = true)]
    pub no_input: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan one or more subnets, or every local one
    #[command(alias = "s")]
    Scan(ScanArgs),
    /// List the subnets a scan would cover by default
    #[command(alias = "n")]
    Networks,
}

#[derive(Args)]
pub struct ScanArgs {
    /// CIDR block(s) such as 192.168.1.0/24, comma separated
    pub target: Option<String>,

    /// Ports to test on live hosts
    #[arg(short, long, value_delimiter = ',')]
    pub ports: Option<Vec<u16>>,

    /// Liveness check: auto, icmp, ping or tcp
    #[arg(long)]
    pub probe: Option<ProbeMethod>,

    /// Hosts scanned in parallel
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Ports tested in parallel per host
    #[arg(long)]
    pub port_jobs: Option<usize>,

    /// Liveness timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Per-port connect timeout in milliseconds
    #[arg(long)]
    pub port_timeout_ms: Option<u64>,

    /// Skip subnets once the target list would exceed this many hosts
    #[arg(long)]
    pub max_hosts: Option<usize>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
