//! Bounded worker pool
//!
//! A semaphore caps how many visit tasks run at once. The dispatch loop waits
//! for a permit before spawning, so at most `size` tasks are ever in flight
//! and the rest of the frontier stays queued.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct WorkerPool {
    /// One permit per concurrent task
    permits: Arc<Semaphore>,

    size: usize,
}

impl WorkerPool {
    /// Creates a pool running at most `size` tasks at once
    ///
    /// A size of zero is raised to one.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Permits not currently held by a running task
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Waits for a free slot, then spawns `task` on it
    ///
    /// The slot is released when the task completes or panics. Returns None
    /// if the semaphore refuses the permit.
    pub async fn execute<F>(&self, task: F) -> Option<JoinHandle<()>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permit = self.permits.clone().acquire_owned().await.ok()?;

        Some(tokio::spawn(async move {
            let _permit = permit;
            task.await;
        }))
    }
}
