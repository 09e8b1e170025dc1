use colored::*;
use radar_common::config::Config;
use radar_common::network::interface::{InterfaceSubnets, SubnetEnumerator};
use radar_common::network::subnet::parse_subnets;

use crate::terminal::{colors, print};

pub async fn networks(cfg: &Config) -> anyhow::Result<()> {
    let cidrs = tokio::task::spawn_blocking(|| InterfaceSubnets.enumerate_local_subnets()).await?;
    let subnets = parse_subnets(&cidrs);

    if cfg.json {
        let listing: Vec<String> = subnets.iter().map(ToString::to_string).collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    print::header("local networks", cfg.quiet);

    let key_width = subnets
        .iter()
        .map(|subnet| subnet.to_string().len())
        .max()
        .unwrap_or_default();

    for subnet in &subnets {
        let hosts = format!("{} hosts", subnet.host_count()).color(colors::ACCENT);
        print::aligned_line(&subnet.to_string(), key_width, hosts);
    }
    Ok(())
}
