use thiserror::Error;

use crate::work::TaskId;

/// Errors surfaced synchronously, before any task of a batch is scheduled.
///
/// Failures of individual task bodies never show up here, they are delivered
/// as [`TaskFailure`](crate::work::TaskFailure) values on the result stream.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid worker count: {0}, at least one worker is required")]
    InvalidWorkerCount(usize),

    #[error("Invalid time unit: must be at least 1ms")]
    InvalidTimeUnit,

    #[error("Duplicate task id: {0}")]
    DuplicateTaskId(TaskId),

    #[error("Invalid parameter for task {id}: {reason}")]
    InvalidParameter { id: TaskId, reason: &'static str },

    #[error("Invalid workload: {0}")]
    InvalidWorkload(&'static str),

    #[error("No tokio runtime available to host the worker pool")]
    NoRuntime,

    #[error("Serde JSON error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Worker join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = Error::InvalidWorkerCount(0);
        assert_eq!(
            error.to_string(),
            "Invalid worker count: 0, at least one worker is required"
        );

        let error = Error::DuplicateTaskId(7);
        assert_eq!(error.to_string(), "Duplicate task id: 7");

        let error = Error::InvalidParameter {
            id: 3,
            reason: "delay must be finite",
        };
        assert_eq!(
            error.to_string(),
            "Invalid parameter for task 3: delay must be finite"
        );

        let error = Error::InvalidWorkload("compute ratio must be within [0, 1]");
        assert_eq!(
            error.to_string(),
            "Invalid workload: compute ratio must be within [0, 1]"
        );

        let error = Error::IO(std::io::Error::new(std::io::ErrorKind::Other, "test"));
        assert_eq!(error.to_string(), "IO error: test");
    }
}
