use std::fmt::Debug;
use thiserror::Error;

pub type TaskId = u64;

/// A unit of work executed on one of the dispatcher's workers.
///
/// `run` is called exactly once, on a blocking worker thread.
pub trait Task: Debug + Send + 'static {
    type Output: Send + 'static;

    fn id(&self) -> TaskId;

    fn run(&self) -> Result<Self::Output, TaskFailure>;
}

/// Failure of a single task body. Never aborts the rest of the batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaskFailure {
    #[error("Resource exhausted: requested {requested} values, limit is {limit}")]
    ResourceExhausted { requested: u64, limit: u64 },

    #[error("Task panicked: {0}")]
    Panicked(String),

    #[error("Task failed: {0}")]
    Failed(String),
}

/// Outcome of one task, tagged with the id of the task that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskResult<O> {
    pub id: TaskId,
    pub outcome: Result<O, TaskFailure>,
}

impl<O> TaskResult<O> {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Lifecycle of a task: `Queued -> Running -> {Completed | Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Queued,
    Running,
    Completed,
    Failed,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }

    pub fn can_transition_to(self, next: TaskState) -> bool {
        matches!(
            (self, next),
            (TaskState::Queued, TaskState::Running)
                | (TaskState::Running, TaskState::Completed)
                | (TaskState::Running, TaskState::Failed)
        )
    }

    /// Terminal state reached by a task that produced `outcome`.
    pub fn finished<O>(outcome: &Result<O, TaskFailure>) -> Self {
        match outcome {
            Ok(_) => TaskState::Completed,
            Err(_) => TaskState::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        use TaskState::*;

        assert!(Queued.can_transition_to(Running));
        assert!(Running.can_transition_to(Completed));
        assert!(Running.can_transition_to(Failed));

        assert!(!Queued.can_transition_to(Completed));
        assert!(!Running.can_transition_to(Queued));
        for terminal in [Completed, Failed] {
            assert!(terminal.is_terminal());
            for next in [Queued, Running, Completed, Failed] {
                assert!(!terminal.can_transition_to(next));
            }
        }
        assert!(!Queued.is_terminal());
        assert!(!Running.is_terminal());
    }

    #[test]
    fn test_finished_state() {
        let ok: Result<u8, TaskFailure> = Ok(1);
        let err: Result<u8, TaskFailure> = Err(TaskFailure::Failed("boom".into()));
        assert_eq!(TaskState::finished(&ok), TaskState::Completed);
        assert_eq!(TaskState::finished(&err), TaskState::Failed);
    }

    #[test]
    fn test_failure_display() {
        let failure = TaskFailure::ResourceExhausted {
            requested: 10,
            limit: 5,
        };
        assert_eq!(
            failure.to_string(),
            "Resource exhausted: requested 10 values, limit is 5"
        );
        assert_eq!(
            TaskFailure::Panicked("oops".into()).to_string(),
            "Task panicked: oops"
        );
    }
}
