use std::future::Future;
use std::sync::Arc;

use radar_common::warn;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinSet};

use super::StopSignal;

/// Fixed-size pool of device tasks.
///
/// Finished tasks are reaped whenever a slot is taken, so the set never holds
/// more than `size` entries no matter how many addresses go through it.
pub(crate) struct WorkerPool {
    permits: Arc<Semaphore>,
    tasks: JoinSet<()>,
}

impl WorkerPool {
    pub(crate) fn new(size: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(size.max(1))),
            tasks: JoinSet::new(),
        }
    }

    /// Waits for a free slot. Returns `None` once `stop` is raised.
    pub(crate) async fn acquire(&mut self, stop: &StopSignal) -> Option<OwnedSemaphorePermit> {
        let permit = stop.run(Arc::clone(&self.permits).acquire_owned()).await?;
        self.reap();
        permit.ok()
    }

    /// Runs `task` in the slot held by `permit`.
    pub(crate) fn spawn<F>(&mut self, permit: OwnedSemaphorePermit, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.reap();
        self.tasks.spawn(async move {
            let _permit = permit;
            task.await;
        });
    }

    /// Waits for every task still in the pool.
    pub(crate) async fn drain(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            report(joined);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }

    fn reap(&mut self) {
        while let Some(joined) = self.tasks.try_join_next() {
            report(joined);
        }
    }
}

fn report(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        warn!("Device task failed: {e}");
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
