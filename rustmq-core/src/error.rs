//! Queue error types

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// The queue operation a storage fault occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Push,
    Pull,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Pull => "pull",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by every queue backend
#[derive(Debug, Error)]
pub enum QueueError {
    /// Rejected before any lock was taken or storage touched.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Lock acquisition exceeded its bound; storage was never touched.
    #[error("timed out waiting for lock on queue: {queue}")]
    LockTimeout { queue: String },

    /// A storage fault, carrying the failing operation, the queue and the
    /// original cause.
    #[error("{operation} failed for queue: {queue}")]
    Storage {
        operation: Operation,
        queue: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl QueueError {
    /// Wrap a backend fault with its operation context.
    pub fn storage(
        operation: Operation,
        queue: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self::Storage {
            operation,
            queue: queue.into(),
            source: source.into(),
        }
    }
}
