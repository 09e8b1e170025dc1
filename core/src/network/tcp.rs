use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use radar_common::trace;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::scanner::ProbeOutcome;

/// Result of a single connect attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortState {
    /// The handshake completed.
    Open,
    /// The host answered with a reset or the attempt failed locally.
    Closed,
    /// Nothing came back before the deadline.
    Filtered,
}

pub async fn connect_port(addr: Ipv4Addr, port: u16, wait: Duration) -> PortState {
    let socket_addr: SocketAddr = SocketAddr::from((addr, port));

    match timeout(wait, TcpStream::connect(socket_addr)).await {
        Ok(Ok(_stream)) => PortState::Open,
        Ok(Err(e)) => {
            trace!("{socket_addr} closed: {e}");
            PortState::Closed
        }
        Err(_elapsed) => PortState::Filtered,
    }
}

/// Liveness through a TCP handshake.
///
/// Both an accepted connection and a refusal prove that something at `addr`
/// answered.
pub async fn handshake_probe(addr: Ipv4Addr, port: u16, wait: Duration) -> ProbeOutcome {
    let socket_addr: SocketAddr = SocketAddr::from((addr, port));

    match timeout(wait, TcpStream::connect(socket_addr)).await {
        Ok(Ok(_stream)) => ProbeOutcome::Reply,
        Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => ProbeOutcome::Reply,
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
