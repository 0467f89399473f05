//! # `taskfan`
//!
//! `taskfan` runs a batch of tasks on a fixed number of workers and hands the
//! results back in the order the tasks finish.
//!
//! ## Example
//!
//! ```rust
//! use futures_util::stream::StreamExt;
//! use taskfan::{Dispatcher, DispatcherConfig, TaskDescriptor};
//!
//! # #[tokio::main]
//! # async fn main() -> taskfan::Result<()> {
//! let config = DispatcherConfig {
//!     max_workers: 2,
//!     time_unit_ms: 10,
//!     ..Default::default()
//! };
//! let dispatcher = Dispatcher::new(config)?;
//!
//! let batch = vec![
//!     TaskDescriptor::latency(0, 1.0),
//!     TaskDescriptor::compute(1, 1_000),
//! ];
//!
//! let mut results = dispatcher.submit_batch(batch)?;
//! while let Some(result) = results.next().await {
//!     println!("{}: {:?}", result.id, result.outcome);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - Bounded concurrency, at most `max_workers` task bodies at once
//! - Completion-order result stream, one result per task
//! - Failed or panicking tasks never take down the rest of the batch
//! - Seedable randomness for reproducible compute workloads

pub mod config;
pub mod error;
pub mod job;
pub mod utils;
pub mod work;

pub use config::DispatcherConfig;
pub use error::{Error, Result};
pub use job::{TaskDescriptor, TaskKind, TaskValue, WorkloadSpec};
pub use work::{
    Dispatcher, NoopObserver, Observer, ResultStream, Task, TaskFailure, TaskId, TaskResult,
    TaskState, TracingObserver,
};
