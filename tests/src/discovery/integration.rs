use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use radar_common::config::ScanConfig;
use radar_common::error::ScanError;
use radar_common::network::device::{DeviceStatus, DeviceType};
use radar_common::scanning::ScanStatus;
use radar_core::discovery::ScanSession;
use radar_core::scanner::device::DeviceScanner;
use tokio::sync::Semaphore;

use super::fakes::{
    FixedSubnets, ScriptedPorts, ScriptedProber, StaticNames, session_with, wait_for_dispatch,
};

fn ip(a: u8, b: u8, c: u8, d: u8) -> Ipv4Addr {
    Ipv4Addr::new(a, b, c, d)
}

#[tokio::test]
async fn slash_30_with_one_live_ssh_host() {
    let prober = Arc::new(ScriptedProber::alive(&[ip(10, 0, 0, 1)]));
    let ports = Arc::new(ScriptedPorts::default().with(ip(10, 0, 0, 1), &[22]));
    let session = session_with(prober.clone(), ports.clone(), vec![], 50);

    let devices = session.scan_network(Some("10.0.0.0/30")).await.unwrap();

    assert_eq!(devices.len(), 1);
    let device = &devices[0];
    assert_eq!(device.address, ip(10, 0, 0, 1));
    assert_eq!(device.open_ports.iter().copied().collect::<Vec<u16>>(), vec![22]);
    assert_eq!(device.device_type, DeviceType::LinuxServer);
    assert_eq!(device.status, DeviceStatus::Online);
    assert_eq!(device.hostname, "Unknown");

    assert_eq!(
        session.status(),
        ScanStatus {
            scanning: false,
            progress: 2,
            total: 2
        }
    );
    assert_eq!(prober.calls.load(Ordering::SeqCst), 2);
    assert_eq!(*ports.scanned.lock().unwrap(), vec![ip(10, 0, 0, 1)]);
}

#[tokio::test]
async fn hostnames_flow_into_records() {
    let prober: Arc<ScriptedProber> = Arc::new(ScriptedProber::alive(&[ip(10, 0, 0, 2)]));
    let scanner = DeviceScanner::new(
        prober,
        Arc::new(ScriptedPorts::default().with(ip(10, 0, 0, 2), &[80, 135])),
        Arc::new(StaticNames(HashMap::from([(ip(10, 0, 0, 2), "iis.corp")]))),
        ScanConfig::default(),
    );
    let session = ScanSession::new(scanner, Arc::new(FixedSubnets(vec![])));

    let devices = session.scan_network(Some("10.0.0.0/30")).await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].hostname, "iis.corp");
    assert_eq!(devices[0].device_type.label(), "Web Server (Windows)");
}

#[tokio::test]
async fn second_start_is_rejected_while_scanning() {
    let gate = Arc::new(Semaphore::new(0));
    let prober = Arc::new(ScriptedProber::alive(&[ip(192, 168, 9, 1)]).gated(gate.clone()));
    let session = session_with(prober, Arc::new(ScriptedPorts::default()), vec![], 8);

    let handle = session.start(Some("192.168.9.0/28".to_string())).unwrap();
    wait_for_dispatch(&session).await;

    let before = session.report();
    assert!(before.status.scanning);
    assert_eq!(before.status.total, 14);

    assert_eq!(
        session.start(Some("10.0.0.0/8".to_string())).unwrap_err(),
        ScanError::Busy
    );
    assert_eq!(
        session.scan_network(None).await.unwrap_err(),
        ScanError::Busy
    );
    assert_eq!(session.report(), before);

    gate.close();
    let devices = handle.await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(
        session.status(),
        ScanStatus {
            scanning: false,
            progress: 14,
            total: 14
        }
    );

    // Idle again, so a new scan is accepted and starts from scratch.
    let devices = session.scan_network(Some("192.168.9.0/30")).await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(session.status().total, 2);
}

#[tokio::test]
async fn panicking_device_task_still_completes_the_scan() {
    let prober = Arc::new(
        ScriptedProber::alive(&[ip(10, 0, 0, 1), ip(10, 0, 0, 2)]).panicking_on(ip(10, 0, 0, 1)),
    );
    let session = session_with(prober, Arc::new(ScriptedPorts::default()), vec![], 4);

    let devices = session.scan_network(Some("10.0.0.0/29")).await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].address, ip(10, 0, 0, 2));
    let status = session.status();
    assert!(!status.scanning);
    assert_eq!(status.progress, status.total);
    assert_eq!(status.total, 6);
}

#[tokio::test]
async fn stop_winds_the_scan_down() {
    let gate = Arc::new(Semaphore::new(0));
    let prober = Arc::new(ScriptedProber::alive(&[]).gated(gate));
    let session = session_with(prober.clone(), Arc::new(ScriptedPorts::default()), vec![], 4);

    let handle = session.start(Some("172.20.0.0/24".to_string())).unwrap();
    wait_for_dispatch(&session).await;
    session.stop();

    let devices = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("stopped scan should finish promptly")
        .unwrap();

    assert!(devices.is_empty());
    let status = session.status();
    assert!(!status.scanning);
    assert_eq!(status.total, 254);
    assert_eq!(status.progress, 254);
    assert!(prober.calls.load(Ordering::SeqCst) <= 4);
}

#[tokio::test]
async fn callback_streams_each_device() {
    let live = [ip(10, 1, 1, 1), ip(10, 1, 1, 2), ip(10, 1, 1, 5)];
    let prober = Arc::new(ScriptedProber::alive(&live));
    let session = session_with(prober, Arc::new(ScriptedPorts::default()), vec![], 3);

    let streamed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&streamed);
    session.set_device_callback(move |device| sink.lock().unwrap().push(device.address));

    let devices = session.scan_network(Some("10.1.1.0/29")).await.unwrap();

    let mut streamed = streamed.lock().unwrap().clone();
    streamed.sort();
    let mut returned: Vec<Ipv4Addr> = devices.iter().map(|d| d.address).collect();
    returned.sort();
    assert_eq!(streamed, live.to_vec());
    assert_eq!(returned, live.to_vec());
}

#[tokio::test]
async fn enumerated_subnets_are_used_without_a_target() {
    let prober = Arc::new(ScriptedProber::alive(&[ip(10, 2, 0, 1), ip(10, 3, 0, 2)]));
    let session = session_with(
        prober,
        Arc::new(ScriptedPorts::default()),
        vec!["10.2.0.0/30", "10.3.0.0/30", "10.2.0.0/255.255.255.252", "bogus"],
        50,
    );

    let devices = session.scan_network(None).await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(session.status().total, 4);
}

#[tokio::test]
async fn tiny_subnets_keep_every_address() {
    let prober = Arc::new(ScriptedProber::alive(&[ip(10, 4, 0, 0), ip(10, 4, 0, 1)]));
    let session = session_with(prober, Arc::new(ScriptedPorts::default()), vec![], 50);

    let devices = session.scan_network(Some("10.4.0.0/31")).await.unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(session.status().total, 2);
}

#[tokio::test]
async fn progress_invariant_holds_while_polling() {
    let live: Vec<Ipv4Addr> = (1..=60).step_by(3).map(|d| ip(10, 5, 0, d)).collect();
    let prober = Arc::new(ScriptedProber::alive(&live));
    let session = session_with(prober, Arc::new(ScriptedPorts::default()), vec![], 5);

    let handle = session.start(Some("10.5.0.0/26".to_string())).unwrap();
    while session.is_scanning() {
        let report = session.report();
        assert!(report.devices <= report.status.progress);
        assert!(report.status.progress <= report.status.total || report.status.total == 0);
        tokio::task::yield_now().await;
    }

    let devices = handle.await.unwrap();
    assert_eq!(devices.len(), live.len());
    assert_eq!(session.status().progress, 62);
}

#[tokio::test]
async fn silent_slash_16_runs_through_the_pool() {
    let prober = Arc::new(ScriptedProber::alive(&[]));
    let session = session_with(prober.clone(), Arc::new(ScriptedPorts::default()), vec![], 50);

    let devices = session.scan_network(Some("10.20.0.0/16")).await.unwrap();

    assert!(devices.is_empty());
    assert_eq!(prober.calls.load(Ordering::SeqCst), 65_534);
    assert_eq!(
        session.status(),
        ScanStatus {
            scanning: false,
            progress: 65_534,
            total: 65_534
        }
    );
}

#[tokio::test]
async fn subnet_beyond_host_limit_is_skipped() {
    let prober = Arc::new(ScriptedProber::alive(&[ip(10, 64, 0, 1)]));
    let session = session_with(prober.clone(), Arc::new(ScriptedPorts::default()), vec![], 50);

    let devices = session
        .scan_network(Some("10.0.0.0/12,10.64.0.0/30"))
        .await
        .unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(session.status().total, 2);
    assert_eq!(prober.calls.load(Ordering::SeqCst), 2);
}
