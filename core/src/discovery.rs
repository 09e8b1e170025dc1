//! # Network Discovery Service
//!
//! Implements the "scan the network" use case on top of [`DeviceScanner`].
//!
//! A [`ScanSession`] owns the only mutable scan state in the process: the
//! [`ScanStatus`] counters and the device list. It runs at most one scan at a
//! time, rejects a second start with [`ScanError::Busy`] and always returns to
//! idle, whether the scan ran to the end, was stopped, or had device tasks
//! blow up along the way.
//!
//! The lock around the state is only ever taken for short, non-suspending
//! updates, so pollers never wait on network I/O.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Instant;

use futures::FutureExt;
use radar_common::config::ScanConfig;
use radar_common::error::ScanError;
use radar_common::network::device::DeviceRecord;
use radar_common::network::interface::{InterfaceSubnets, SubnetEnumerator, fallback_subnets};
use radar_common::network::subnet::{Subnet, expand_hosts, parse_subnets};
use radar_common::scanning::{ScanStatus, StatusReport};
use radar_common::{debug, info, warn};
use tokio::task::JoinHandle;

use crate::scanner::device::DeviceScanner;

mod pool;
mod state;
mod stop;

use pool::WorkerPool;
use state::SessionState;
pub use stop::StopSignal;

/// Invoked once per discovered device, in completion order.
pub type DeviceCallback = Arc<dyn Fn(&DeviceRecord) + Send + Sync>;

/// Handle to the scan session. Clones share the same state.
#[derive(Clone)]
pub struct ScanSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    state: Mutex<SessionState>,
    scanner: DeviceScanner,
    enumerator: Arc<dyn SubnetEnumerator>,
    host_concurrency: usize,
    max_hosts: usize,
    on_device: RwLock<Option<DeviceCallback>>,
    stop: StopSignal,
}

/// Puts the session back to idle when the scan future ends or is dropped.
struct FinishGuard {
    inner: Arc<SessionInner>,
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        self.inner.lock().finish();
    }
}

impl ScanSession {
    pub fn new(scanner: DeviceScanner, enumerator: Arc<dyn SubnetEnumerator>) -> Self {
        let host_concurrency = scanner.config().host_concurrency.max(1);
        let max_hosts = scanner.config().max_hosts.max(1);
        Self {
            inner: Arc::new(SessionInner {
                state: Mutex::new(SessionState::default()),
                scanner,
                enumerator,
                host_concurrency,
                max_hosts,
                on_device: RwLock::new(None),
                stop: StopSignal::new(),
            }),
        }
    }

    /// A session using the stock probers and the interface-based enumerator.
    pub fn from_config(config: ScanConfig) -> Self {
        Self::new(DeviceScanner::from_config(config), Arc::new(InterfaceSubnets))
    }

    /// Registers a callback for streaming consumers, replacing any previous one.
    pub fn set_device_callback<F>(&self, callback: F)
    where
        F: Fn(&DeviceRecord) + Send + Sync + 'static,
    {
        let mut slot = self
            .inner
            .on_device
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::new(callback));
    }

    /// Starts a scan in the background and returns immediately.
    ///
    /// `target` is one subnet or a comma separated list of them. With `None`
    /// every local subnet is scanned. The busy check and the reset happen
    /// before this returns, so a poller never sees the previous results once
    /// it gets `Ok`.
    pub fn start(&self, target: Option<String>) -> Result<JoinHandle<Vec<DeviceRecord>>, ScanError> {
        let guard = self.inner.begin()?;
        let inner = Arc::clone(&self.inner);
        Ok(tokio::spawn(async move { inner.run(target.as_deref(), guard).await }))
    }

    /// Runs a scan to completion and returns the devices it found.
    pub async fn scan_network(&self, target: Option<&str>) -> Result<Vec<DeviceRecord>, ScanError> {
        let guard = self.inner.begin()?;
        Ok(Arc::clone(&self.inner).run(target, guard).await)
    }

    /// Asks the running scan to wind down. In-flight device scans are
    /// abandoned at their next suspension point and nothing new is dispatched.
    pub fn stop(&self) {
        if self.is_scanning() {
            info!("Stopping scan");
        }
        self.inner.stop.raise();
    }

    pub fn status(&self) -> ScanStatus {
        self.inner.lock().status
    }

    pub fn report(&self) -> StatusReport {
        self.inner.lock().report()
    }

    /// Snapshot of the devices found by the current or last scan.
    pub fn devices(&self) -> Vec<DeviceRecord> {
        self.inner.lock().devices.clone()
    }

    pub fn is_scanning(&self) -> bool {
        self.inner.lock().status.scanning
    }

    /// Asks the enumerator for local subnets, falling back to the
    /// conventional private ranges when it comes back empty or dies.
    pub async fn local_subnets(&self) -> BTreeSet<String> {
        self.inner.local_subnets().await
    }
}

impl SessionInner {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(self: &Arc<Self>) -> Result<FinishGuard, ScanError> {
        let mut state = self.lock();
        state.begin()?;
        self.stop.reset();
        Ok(FinishGuard {
            inner: Arc::clone(self),
        })
    }

    async fn run(self: Arc<Self>, target: Option<&str>, _guard: FinishGuard) -> Vec<DeviceRecord> {
        let started = Instant::now();

        let subnets = self.resolve_targets(target).await;
        let addresses = expand_hosts(&subnets);
        self.lock().set_total(addresses.len());

        info!(
            "Scanning {} addresses across {} subnet(s)",
            addresses.len(),
            subnets.len()
        );

        self.dispatch(addresses).await;

        let devices = self.lock().devices.clone();
        info!(
            "Scan finished in {:.2}s: {} device(s) online",
            started.elapsed().as_secs_f64(),
            devices.len()
        );
        devices
    }

    async fn resolve_targets(&self, target: Option<&str>) -> Vec<Subnet> {
        let explicit: Vec<String> = target
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(String::from)
            .collect();

        let subnets = if explicit.is_empty() {
            parse_subnets(self.local_subnets().await)
        } else {
            parse_subnets(explicit)
        };

        within_budget(subnets, self.max_hosts)
    }

    async fn local_subnets(&self) -> BTreeSet<String> {
        let enumerator = Arc::clone(&self.enumerator);
        match tokio::task::spawn_blocking(move || enumerator.enumerate_local_subnets()).await {
            Ok(subnets) if !subnets.is_empty() => subnets,
            Ok(_) => {
                debug!("No local subnets found, using the fallback ranges");
                fallback_subnets()
            }
            Err(e) => {
                warn!("Subnet enumeration failed ({e}), using the fallback ranges");
                fallback_subnets()
            }
        }
    }

    async fn dispatch(self: &Arc<Self>, addresses: Vec<Ipv4Addr>) {
        let mut pool = WorkerPool::new(self.host_concurrency);
        let mut skipped: usize = 0;

        for addr in addresses {
            if self.stop.is_raised() {
                skipped += 1;
                self.complete(None);
                continue;
            }

            let permit = match pool.acquire(&self.stop).await {
                Some(permit) => permit,
                None => {
                    skipped += 1;
                    self.complete(None);
                    continue;
                }
            };

            let inner = Arc::clone(self);
            pool.spawn(permit, async move {
                let scan = inner.stop.run(inner.scanner.scan_device(addr));
                let record = match AssertUnwindSafe(scan).catch_unwind().await {
                    Ok(record) => record.flatten(),
                    Err(_) => {
                        warn!("Device scan of {addr} panicked");
                        None
                    }
                };
                inner.complete(record);
            });
        }

        if skipped > 0 {
            debug!("Stop requested, {skipped} address(es) left unscanned");
        }

        pool.drain().await;
    }

    /// Books one finished device task and notifies the callback outside the lock.
    fn complete(&self, record: Option<DeviceRecord>) {
        let Some(record) = record else {
            self.lock().complete(None);
            return;
        };

        self.lock().complete(Some(record.clone()));

        let callback = self
            .on_device
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(callback) = callback {
            if std::panic::catch_unwind(AssertUnwindSafe(|| callback(&record))).is_err() {
                warn!("Device callback panicked for {}", record.address);
            }
        }
    }
}

/// Keeps subnets in order while their hosts fit in `max_hosts`, skipping the
/// ones that would overflow it.
fn within_budget(subnets: Vec<Subnet>, max_hosts: usize) -> Vec<Subnet> {
    let mut budget = max_hosts;
    subnets
        .into_iter()
        .filter(|subnet| {
            let hosts = subnet.host_count();
            if hosts > budget {
                warn!("Skipping {subnet}: {hosts} hosts exceed the {max_hosts} host limit");
                return false;
            }
            budget -= hosts;
            debug!("Target subnet {subnet} ({hosts} hosts)");
            true
        })
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
