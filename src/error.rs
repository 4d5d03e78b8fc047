//! Error types for queue operations.

use thiserror::Error;

/// Represents the ways a queue operation can fail.
///
/// Every fallible operation reports its failure synchronously; nothing is
/// retried and a failed operation leaves the queue unchanged.
///
/// # Examples
///
/// ```rust
/// use ringqueue::{Queue, QueueError};
///
/// let mut queue = Queue::new();
/// assert_eq!(queue.delete_mid(), Err(QueueError::Empty));
/// assert_eq!(format!("{}", QueueError::Empty), "queue is empty");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// A required handle or value was absent.
    #[error("invalid argument: `{argument}` is missing")]
    InvalidArgument {
        /// Name of the missing argument.
        argument: &'static str,
    },

    /// Backing storage could not be reserved. Any partial allocation has
    /// been rolled back.
    #[error("{operation}: allocation failed")]
    AllocationFailure {
        /// Operation that was allocating.
        operation: &'static str,
    },

    /// The operation needs at least one element.
    #[error("queue is empty")]
    Empty,

    /// The operation needs more elements than the queue holds.
    #[error("queue holds {actual} element(s) but at least {required} are required")]
    TooFewElements {
        /// Minimum number of elements the operation needs.
        required: usize,
        /// Number of elements the queue holds.
        actual: usize,
    },

    /// The context handle does not belong to this chain.
    #[error("queue context is not part of this chain")]
    UnknownContext,
}
