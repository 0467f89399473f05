use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crossbeam::channel::Receiver;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::work::observer::Observer;
use crate::work::task::{Task, TaskFailure, TaskId, TaskResult, TaskState};

/// A blocking thread that pulls tasks off the shared queue until it is
/// drained and closed.
#[derive(Debug)]
pub(crate) struct Worker {
    join_handle: JoinHandle<()>,
}

impl Worker {
    pub(crate) fn new<T: Task>(
        index: usize,
        handle: &Handle,
        receiver: Receiver<T>,
        results: UnboundedSender<TaskResult<T::Output>>,
        observer: Arc<dyn Observer>,
    ) -> Self {
        let join_handle = handle.spawn_blocking(move || {
            while let Ok(task) = receiver.recv() {
                if results.is_closed() {
                    // Nobody is listening anymore: leave the unstarted rest of the queue behind.
                    tracing::debug!(worker = index, "result stream closed, discarding queued tasks");
                    break;
                }
                let result = execute(index, &task, observer.as_ref());
                if results.send(result).is_err() {
                    // The stream was dropped. Tasks are not cancelled, only their results discarded.
                    tracing::debug!(worker = index, "result stream closed, discarding result");
                }
            }
            tracing::debug!(worker = index, "queue drained, worker exiting");
        });
        Self { join_handle }
    }

    pub(crate) async fn join(self) -> Result<(), tokio::task::JoinError> {
        self.join_handle.await?;
        Ok(())
    }
}

/// Runs one task body, converting a panic into a failed outcome.
fn execute<T: Task>(worker: usize, task: &T, observer: &dyn Observer) -> TaskResult<T::Output> {
    let id = task.id();
    notify(id, || observer.on_started(id, worker));

    let started = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| task.run()))
        .unwrap_or_else(|payload| Err(TaskFailure::Panicked(panic_message(payload.as_ref()))));

    let state = TaskState::finished(&outcome);
    notify(id, || observer.on_finished(id, state, started.elapsed()));
    TaskResult { id, outcome }
}

/// Observer panics are logged and otherwise ignored, the task result is still delivered.
fn notify(id: TaskId, callback: impl FnOnce()) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(callback)) {
        tracing::error!(task = id, "observer panicked: {}", panic_message(payload.as_ref()));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Fixed set of workers sharing one task queue and one result channel.
#[derive(Debug)]
pub(crate) struct WorkerPool {
    workers: Vec<Worker>,
}

impl WorkerPool {
    pub(crate) fn new<T: Task>(
        num_workers: usize,
        handle: &Handle,
        receiver: Receiver<T>,
        results: UnboundedSender<TaskResult<T::Output>>,
        observer: Arc<dyn Observer>,
    ) -> Self {
        // Every worker gets its own handle on the queue and the result channel;
        // the channel closes once the last worker exits.
        let workers = (0..num_workers)
            .map(|index| {
                Worker::new(
                    index,
                    handle,
                    receiver.clone(),
                    results.clone(),
                    observer.clone(),
                )
            })
            .collect::<Vec<_>>();
        Self { workers }
    }

    pub(crate) fn len(&self) -> usize {
        self.workers.len()
    }

    pub(crate) async fn join(self) -> Result<(), tokio::task::JoinError> {
        for worker in self.workers {
            worker.join().await?;
        }
        Ok(())
    }
}
