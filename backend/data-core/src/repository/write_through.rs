//! Bookkeeping for detached local writes.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use log::warn;
use tokio::task::JoinHandle;

/// Handles of write-through tasks that may still be running.
///
/// Tasks are never cancelled; dropping the owner leaves them running.
#[derive(Clone, Default)]
pub(crate) struct WriteThroughs {
    handles: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl WriteThroughs {
    pub(crate) fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(task);
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        handles.retain(|handle| !handle.is_finished());
        handles.push(handle);
    }

    pub(crate) fn pending(&self) -> usize {
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Wait until every task registered so far, and any registered meanwhile, ends.
    pub(crate) async fn flush(&self) {
        loop {
            let pending = std::mem::take(
                &mut *self.handles.lock().unwrap_or_else(PoisonError::into_inner),
            );
            if pending.is_empty() {
                return;
            }
            for handle in pending {
                if let Err(e) = handle.await {
                    warn!("Write-through task ended abnormally: {e}");
                }
            }
        }
    }
}
