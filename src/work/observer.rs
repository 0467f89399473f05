use std::time::Duration;

use crate::work::task::{TaskId, TaskState};

/// Progress callbacks invoked by the dispatcher.
///
/// `on_queued` runs on the submitting thread, the other two on the worker
/// thread executing the task. Implementations must not block for long.
pub trait Observer: Send + Sync + 'static {
    fn on_queued(&self, _id: TaskId) {}

    fn on_started(&self, _id: TaskId, _worker: usize) {}

    fn on_finished(&self, _id: TaskId, _state: TaskState, _elapsed: Duration) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Logs task progress through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_queued(&self, id: TaskId) {
        tracing::trace!(task = id, "task queued");
    }

    fn on_started(&self, id: TaskId, worker: usize) {
        tracing::info!(task = id, worker, "task started");
    }

    fn on_finished(&self, id: TaskId, state: TaskState, elapsed: Duration) {
        match state {
            TaskState::Failed => tracing::warn!(task = id, ?elapsed, "task failed"),
            _ => tracing::info!(task = id, ?elapsed, "task completed"),
        }
    }
}
