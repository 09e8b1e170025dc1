use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use radar_common::config::ScanConfig;
use radar_common::network::device::DeviceType;
use radar_core::discovery::ScanSession;
use radar_core::scanner::device::DeviceScanner;
use radar_core::scanner::ports::TcpPortScanner;
use radar_core::scanner::probe::TcpProber;
use radar_core::scanner::resolver::NoResolver;
use tokio::net::TcpListener;

use super::fakes::{FixedSubnets, ScriptedProber};

async fn listen() -> (TcpListener, u16) {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

/// Real connect scan against loopback listeners, liveness faked.
#[tokio::test]
async fn loopback_ports_are_found_by_the_connect_scanner() {
    let (_first, first_port) = listen().await;
    let (_second, second_port) = listen().await;
    let (closed, closed_port) = listen().await;
    drop(closed);

    let config = ScanConfig::default()
        .with_ports(vec![second_port, closed_port, first_port])
        .with_port_timeout(Duration::from_millis(500));
    let scanner = DeviceScanner::new(
        Arc::new(ScriptedProber::alive(&[Ipv4Addr::LOCALHOST])),
        Arc::new(TcpPortScanner::new(2)),
        Arc::new(NoResolver),
        config,
    );
    let session = ScanSession::new(scanner, Arc::new(FixedSubnets(vec![])));

    let devices = session.scan_network(Some("127.0.0.1/32")).await.unwrap();

    assert_eq!(devices.len(), 1);
    let mut expected = vec![first_port, second_port];
    expected.sort_unstable();
    assert_eq!(devices[0].open_ports.iter().copied().collect::<Vec<u16>>(), expected);
    assert_eq!(devices[0].device_type, DeviceType::Unknown);
}

/// A completed handshake on a liveness port marks the host up.
#[tokio::test]
async fn tcp_prober_sees_loopback_as_alive() {
    let (_listener, port) = listen().await;
    let scanner = DeviceScanner::new(
        Arc::new(TcpProber::new(vec![port])),
        Arc::new(TcpPortScanner::default()),
        Arc::new(NoResolver),
        ScanConfig::default().with_ports(vec![port]),
    );

    let record = scanner.scan_device(Ipv4Addr::LOCALHOST).await.unwrap();
    assert_eq!(record.address, Ipv4Addr::LOCALHOST);
    assert!(record.open_ports.contains(&port));
}
