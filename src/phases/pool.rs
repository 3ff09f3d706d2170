//! Bounded pool for blocking render work.

use crate::error::RenderError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Runs blocking jobs on tokio's blocking threads, at most `size` at a time.
///
/// Clones share the same limit.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    /// One worker per available CPU.
    pub fn with_available_parallelism() -> Self {
        let size = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(size)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Start `job` as soon as a worker is free. The job is scheduled immediately; the returned
    /// future only waits for its result. Must be called within a tokio runtime.
    pub fn spawn<F, R>(&self, job: F) -> impl Future<Output = Result<R, RenderError>>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        let handle = tokio::spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|_| RenderError::WorkerFailed("worker pool closed".to_string()))?;
            tokio::task::spawn_blocking(job)
                .await
                .map_err(|e| RenderError::WorkerFailed(e.to_string()))
        });
        async move {
            handle
                .await
                .map_err(|e| RenderError::WorkerFailed(e.to_string()))?
        }
    }
}
