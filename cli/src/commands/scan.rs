use std::time::{Duration, Instant};

use colored::*;
use radar_common::config::{Config, ScanConfig};
use radar_common::error::ScanError;
use radar_common::network::device::DeviceRecord;
use radar_common::scanning::StatusReport;
use radar_common::{info, success};
use radar_core::discovery::ScanSession;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use super::ScanArgs;
use crate::mprint;
use crate::terminal::input::InputHandle;
use crate::terminal::{colors, format, logging, print};

const STATUS_POLL: Duration = Duration::from_millis(150);

pub async fn scan(args: ScanArgs, cfg: &Config) -> anyhow::Result<()> {
    let target = args.target.clone();
    let session = ScanSession::from_config(scan_config(args, cfg));

    if !cfg.json && cfg.quiet == 0 {
        session.set_device_callback(|device| {
            success!("{} is up ({})", device.address, device.device_type);
        });
    }

    if !cfg.json {
        print::header("scanning", cfg.quiet);
    }
    if let Some(target) = &target {
        info!("Target: {target}");
    }

    let span = info_span!("scan");
    span.pb_set_style(&logging::progress_style());
    let guard = span.enter();

    let start_time = Instant::now();
    let mut handle = session.start(target)?;

    let input = if cfg.disable_input {
        None
    } else {
        let remote = session.clone();
        InputHandle::start(move || remote.stop())
    };
    if input.is_some() {
        info!("Press 'q' to stop early");
    }

    let mut ticker = tokio::time::interval(STATUS_POLL);
    let devices: Vec<DeviceRecord> = loop {
        tokio::select! {
            joined = &mut handle => break joined.map_err(|e| ScanError::Runtime(e.to_string()))?,
            _ = tokio::signal::ctrl_c() => session.stop(),
            _ = ticker.tick() => update_progress(&span, session.report()),
        }
    };
    update_progress(&span, session.report());

    drop(input);
    drop(guard);

    let report = session.report();
    if cfg.json {
        return print_json(&report, &devices);
    }

    scan_ends(devices, start_time.elapsed(), cfg);
    Ok(())
}

fn scan_config(args: ScanArgs, cfg: &Config) -> ScanConfig {
    let mut config = ScanConfig::default().with_hostname_resolution(!cfg.no_dns);

    if let Some(ports) = args.ports {
        config = config.with_ports(ports);
    }
    if let Some(method) = args.probe {
        config = config.with_probe_method(method);
    }
    if let Some(jobs) = args.jobs {
        config = config.with_host_concurrency(jobs);
    }
    if let Some(jobs) = args.port_jobs {
        config = config.with_port_concurrency(jobs);
    }
    if let Some(ms) = args.timeout_ms {
        config = config.with_probe_timeout(Duration::from_millis(ms));
    }
    if let Some(ms) = args.port_timeout_ms {
        config = config.with_port_timeout(Duration::from_millis(ms));
    }
    if let Some(hosts) = args.max_hosts {
        config = config.with_max_hosts(hosts);
    }
    config
}

fn update_progress(span: &Span, report: StatusReport) {
    span.pb_set_length(report.status.total as u64);
    span.pb_set_position(report.status.progress as u64);
    span.pb_set_message(&progress_message(&report));
}

fn progress_message(report: &StatusReport) -> String {
    format!("{:>3.0}% | {} online", report.status.percent(), report.devices)
}

fn print_json(report: &StatusReport, devices: &[DeviceRecord]) -> anyhow::Result<()> {
    println!("{}", render_json(report, devices)?);
    Ok(())
}

fn render_json(report: &StatusReport, devices: &[DeviceRecord]) -> serde_json::Result<String> {
    let output = serde_json::json!({
        "status": report,
        "devices": devices,
    });
    serde_json::to_string_pretty(&output)
}

fn scan_ends(mut devices: Vec<DeviceRecord>, total_time: Duration, cfg: &Config) {
    if devices.is_empty() {
        print::header("zero hosts detected", cfg.quiet);
        print::no_results();
        return;
    }

    if cfg.quiet > 0 {
        mprint!();
    }

    print::header("network scan", cfg.quiet);
    devices.sort_by_key(|device| device.address);
    print_devices(&devices, cfg);
    print_summary(devices.len(), total_time, cfg);
}

fn print_devices(devices: &[DeviceRecord], cfg: &Config) {
    if cfg.quiet > 1 {
        return;
    }
    for (idx, device) in devices.iter().enumerate() {
        let name = if device.has_hostname() {
            device.hostname.clone()
        } else {
            device.address.to_string()
        };
        print::tree_head(idx, &name);
        print::as_tree_one_level(format::device_to_details(device, !cfg.no_dns));
        if idx + 1 != devices.len() {
            mprint!();
        }
    }
}

fn print_summary(found: usize, total_time: Duration, cfg: &Config) {
    let active: ColoredString = format!("{found} devices").bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: ColoredString =
        format!("Scan Complete: {active} online, found in {total_time}").color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output.to_string());
        }
        _ => {
            mprint!();
            print::print(&format!("{} {}", "[+]".green().bold(), output));
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
