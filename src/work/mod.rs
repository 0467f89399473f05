pub mod dispatcher;
pub mod observer;
pub mod stream;
pub mod task;
mod worker;

pub use dispatcher::Dispatcher;
pub use observer::{NoopObserver, Observer, TracingObserver};
pub use stream::ResultStream;
pub use task::{Task, TaskFailure, TaskId, TaskResult, TaskState};

#[cfg(test)]
mod tests {
    use crate::work::task::{Task, TaskFailure, TaskId};
    use std::thread::sleep;
    use std::time::Duration;

    #[derive(Debug, Clone)]
    pub enum Behaviour {
        Succeed(u64),
        Fail,
        Panic,
    }

    /// Test double with a configurable outcome and an optional busy period.
    #[derive(Debug, Clone)]
    pub struct ExampleTask {
        pub id: TaskId,
        pub behaviour: Behaviour,
        pub delay: Duration,
    }

    impl ExampleTask {
        pub fn ok(id: TaskId, value: u64) -> Self {
            Self {
                id,
                behaviour: Behaviour::Succeed(value),
                delay: Duration::ZERO,
            }
        }

        pub fn failing(id: TaskId) -> Self {
            Self {
                id,
                behaviour: Behaviour::Fail,
                delay: Duration::ZERO,
            }
        }

        pub fn panicking(id: TaskId) -> Self {
            Self {
                id,
                behaviour: Behaviour::Panic,
                delay: Duration::ZERO,
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    impl Task for ExampleTask {
        type Output = u64;

        fn id(&self) -> TaskId {
            self.id
        }

        fn run(&self) -> Result<Self::Output, TaskFailure> {
            sleep(self.delay);
            match self.behaviour {
                Behaviour::Succeed(value) => Ok(value),
                Behaviour::Fail => Err(TaskFailure::Failed(format!("task {} failed", self.id))),
                Behaviour::Panic => panic!("task {} panicked", self.id),
            }
        }
    }
}
