//! Cancellable delayed execution.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::AbortHandle;
use tracing::error;

/// Runs at most one delayed task at a time.
///
/// Each [`run`](Debouncer::run) schedules its future behind a quiet period.
/// Scheduling again before the period ends aborts the earlier task, whose
/// caller then gets `None`. Dropping the debouncer aborts whatever is
/// pending.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<AbortHandle>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Wait out the quiet period, then run `task`.
    ///
    /// Returns `None` if a later call or [`cancel`](Debouncer::cancel)
    /// superseded this one.
    pub async fn run<F, T>(&self, task: F) -> Option<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await
        });
        self.replace(Some(handle.abort_handle()));

        match handle.await {
            Ok(value) => Some(value),
            Err(e) if e.is_cancelled() => None,
            Err(e) => {
                error!(error = %e, "debounced task panicked");
                None
            }
        }
    }

    /// Abort the pending task, if any.
    pub fn cancel(&self) {
        self.replace(None);
    }

    fn replace(&self, next: Option<AbortHandle>) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = std::mem::replace(&mut *pending, next) {
            previous.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
