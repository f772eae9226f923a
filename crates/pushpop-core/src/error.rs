//! Error types for Pushpop core systems.

use std::fmt;

use crate::task::TaskId;

/// The error type for core bookkeeping operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The task ID is unknown, or the task has already run or been cancelled.
    InvalidTaskId(TaskId),
    /// The connection ID is invalid or has already been disconnected.
    InvalidConnection,
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTaskId(id) => {
                write!(f, "Task {} is not pending", id.as_u64())
            }
            Self::InvalidConnection => {
                write!(f, "Invalid or disconnected signal connection")
            }
        }
    }
}

impl std::error::Error for CoreError {}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
