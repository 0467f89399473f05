use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use rand::Rng;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::config::DispatcherConfig;
use crate::error::{Error, Result};
use crate::job::{Job, JobLimits, TaskDescriptor, TaskValue};
use crate::work::observer::{Observer, TracingObserver};
use crate::work::stream::ResultStream;
use crate::work::task::Task;
use crate::work::worker::WorkerPool;

/// Runs batches of tasks on at most `max_workers` blocking workers.
///
/// Workers are hosted on the blocking pool of the tokio runtime that was
/// current when the dispatcher was created.
pub struct Dispatcher {
    config: DispatcherConfig,
    observer: Arc<dyn Observer>,
    handle: Handle,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(config: DispatcherConfig) -> Result<Self> {
        config.validate()?;
        let handle = Handle::try_current().map_err(|_| Error::NoRuntime)?;

        Ok(Self {
            config,
            observer: Arc::new(TracingObserver),
            handle,
        })
    }

    pub fn with_observer<O: Observer>(mut self, observer: O) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Submits a batch of built-in latency and compute tasks.
    ///
    /// Compute tasks draw their values from the configured seed, or from the
    /// OS when none is set.
    pub fn submit_batch(&self, descriptors: Vec<TaskDescriptor>) -> Result<ResultStream<TaskValue>> {
        let mut rng = self.config.rng();
        self.submit_batch_with_rng(descriptors, &mut rng)
    }

    /// Like [`submit_batch`](Self::submit_batch), seeding every compute task from `rng`.
    pub fn submit_batch_with_rng<R: Rng>(
        &self,
        descriptors: Vec<TaskDescriptor>,
        rng: &mut R,
    ) -> Result<ResultStream<TaskValue>> {
        let limits = JobLimits::from(&self.config);
        let jobs = descriptors
            .into_iter()
            .map(|descriptor| Job::new(descriptor, rng.random(), limits))
            .collect::<Result<Vec<_>>>()?;

        self.dispatch(jobs)
    }

    /// Queues every task and starts the workers.
    ///
    /// All validation happens before the first task is queued; on error
    /// nothing runs.
    pub fn dispatch<T: Task>(&self, tasks: Vec<T>) -> Result<ResultStream<T::Output>> {
        let mut ids = HashSet::with_capacity(tasks.len());
        for task in &tasks {
            if !ids.insert(task.id()) {
                return Err(Error::DuplicateTaskId(task.id()));
            }
        }

        let total = tasks.len();
        let (task_sender, task_receiver) = crossbeam::channel::unbounded();
        let (result_sender, result_receiver) = mpsc::unbounded_channel();

        for task in tasks {
            self.observer.on_queued(task.id());
            // The receiver is still held here, so the queue cannot be disconnected.
            let _ = task_sender.send(task);
        }
        // Workers exit once the queue is both empty and closed.
        drop(task_sender);

        let num_workers = self.config.max_workers.min(total);
        let pool = WorkerPool::new(
            num_workers,
            &self.handle,
            task_receiver,
            result_sender,
            self.observer.clone(),
        );
        tracing::debug!(tasks = total, workers = pool.len(), "batch dispatched");

        Ok(ResultStream::new(result_receiver, total, pool))
    }
}
