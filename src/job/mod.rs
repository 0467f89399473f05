//! Built-in task kinds: simulated remote calls and simulated CPU load.

pub mod workload;

use std::fmt;
use std::thread::sleep;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::DispatcherConfig;
use crate::error::{Error, Result};
use crate::work::task::{Task, TaskFailure, TaskId};

pub use workload::WorkloadSpec;

/// Status returned by a latency task that completed its round trip.
pub const STATUS_OK: u16 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskKind {
    /// Waits `delay` time units, like a call to a slow remote endpoint.
    Latency { delay: f64 },
    /// Materializes and sums `count` random values.
    Compute { count: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub id: TaskId,
    #[serde(flatten)]
    pub kind: TaskKind,
}

impl TaskDescriptor {
    pub fn latency(id: TaskId, delay: f64) -> Self {
        Self {
            id,
            kind: TaskKind::Latency { delay },
        }
    }

    pub fn compute(id: TaskId, count: u64) -> Self {
        Self {
            id,
            kind: TaskKind::Compute { count },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let TaskKind::Latency { delay } = self.kind {
            if !delay.is_finite() {
                return Err(Error::InvalidParameter {
                    id: self.id,
                    reason: "delay must be finite",
                });
            }
            if delay < 0.0 {
                return Err(Error::InvalidParameter {
                    id: self.id,
                    reason: "delay must not be negative",
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskValue {
    Status(u16),
    Sum(f64),
}

impl fmt::Display for TaskValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskValue::Status(code) => write!(f, "status {}", code),
            TaskValue::Sum(sum) => write!(f, "sum {:.4}", sum),
        }
    }
}

/// Execution limits shared by every job of a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JobLimits {
    pub time_unit: Duration,
    pub compute_limit: u64,
}

impl From<&DispatcherConfig> for JobLimits {
    fn from(config: &DispatcherConfig) -> Self {
        Self {
            time_unit: config.time_unit(),
            compute_limit: config.compute_limit,
        }
    }
}

/// A validated descriptor ready to run on a worker.
#[derive(Debug, Clone)]
pub struct Job {
    descriptor: TaskDescriptor,
    seed: u64,
    limits: JobLimits,
}

impl Job {
    pub fn new(descriptor: TaskDescriptor, seed: u64, limits: JobLimits) -> Result<Self> {
        descriptor.validate()?;
        Ok(Self {
            descriptor,
            seed,
            limits,
        })
    }

    pub fn descriptor(&self) -> &TaskDescriptor {
        &self.descriptor
    }

    fn wait(&self, delay: f64) -> std::result::Result<TaskValue, TaskFailure> {
        let duration = Duration::try_from_secs_f64(self.limits.time_unit.as_secs_f64() * delay)
            .map_err(|e| TaskFailure::Failed(format!("delay of {} units: {}", delay, e)))?;
        sleep(duration);
        Ok(TaskValue::Status(STATUS_OK))
    }

    fn compute(&self, count: u64) -> std::result::Result<TaskValue, TaskFailure> {
        if count > self.limits.compute_limit {
            return Err(TaskFailure::ResourceExhausted {
                requested: count,
                limit: self.limits.compute_limit,
            });
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let values = (0..count).map(|_| rng.random::<f64>()).collect::<Vec<_>>();
        Ok(TaskValue::Sum(values.iter().sum()))
    }
}

impl Task for Job {
    type Output = TaskValue;

    fn id(&self) -> TaskId {
        self.descriptor.id
    }

    fn run(&self) -> std::result::Result<Self::Output, TaskFailure> {
        match self.descriptor.kind {
            TaskKind::Latency { delay } => self.wait(delay),
            TaskKind::Compute { count } => self.compute(count),
        }
    }
}
