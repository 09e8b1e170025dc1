//! Platform `ping` invocation.

use std::net::Ipv4Addr;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::scanner::ProbeOutcome;

/// Extra time granted to the child process on top of its own deadline.
const PROCESS_GRACE: Duration = Duration::from_secs(1);

/// Arguments for a single echo request with a reply deadline.
pub fn ping_args(addr: Ipv4Addr, wait: Duration) -> Vec<String> {
    let target = addr.to_string();

    if cfg!(target_os = "windows") {
        let millis = wait.as_millis().max(1);
        vec!["-n".into(), "1".into(), "-w".into(), millis.to_string(), target]
    } else if cfg!(target_os = "macos") {
        let millis = wait.as_millis().max(1);
        vec!["-c".into(), "1".into(), "-W".into(), millis.to_string(), target]
    } else {
        let secs = wait.as_secs_f64().ceil().max(1.0) as u64;
        vec!["-c".into(), "1".into(), "-W".into(), secs.to_string(), target]
    }
}

/// Runs the system `ping` once. A missing binary or spawn failure is reported
/// as [`ProbeOutcome::Failed`].
pub async fn system_ping(addr: Ipv4Addr, wait: Duration) -> ProbeOutcome {
    let mut command = Command::new("ping");
    command
        .args(ping_args(addr, wait))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let child = match command.spawn() {
        Ok(child) => child,
        Err(e) => return ProbeOutcome::Failed(format!("cannot run ping: {e}")),
    };

    match timeout(wait + PROCESS_GRACE, child.wait_with_output()).await {
        Ok(Ok(output)) if output.status.success() => ProbeOutcome::Reply,
        Ok(Ok(_)) => ProbeOutcome::Timeout,
        Ok(Err(e)) => ProbeOutcome::Failed(e.to_string()),
        Err(_elapsed) => ProbeOutcome::Timeout,
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
