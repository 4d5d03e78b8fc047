//! Handle-level facade.
//!
//! These functions mirror the queue's plain interface: queue handles and
//! values may be absent (`None` plays the role of a null handle), fallible
//! operations answer with a success flag, and removals answer with an
//! optional [`Element`]. A missing argument is a no-op that returns the
//! operation's failure value.
//!
//! ```rust
//! use ringqueue::api;
//!
//! let mut queue = api::new();
//! assert!(api::insert_tail(queue.as_mut(), Some("a")));
//! assert!(!api::insert_tail(queue.as_mut(), None));
//! assert!(!api::insert_tail(None, Some("a")));
//! assert_eq!(api::size(queue.as_ref()), 1);
//!
//! let mut buffer = [0u8; 4];
//! let element = api::remove_head(queue.as_mut(), Some(&mut buffer[..]));
//! assert_eq!(element.as_deref(), Some("a"));
//! assert_eq!(&buffer, b"a\0\0\0");
//!
//! api::release_element(element);
//! api::free(queue);
//! ```

use tracing::debug;

use crate::chain::QueueChain;
use crate::error::QueueError;
use crate::queue::{Element, Queue};
use crate::ring::SortOrder;

fn require<T>(handle: Option<T>, argument: &'static str) -> Result<T, QueueError> {
    handle.ok_or(QueueError::InvalidArgument { argument })
}

fn succeeded(operation: &'static str, outcome: Result<(), QueueError>) -> bool {
    match outcome {
        Ok(()) => true,
        Err(error) => {
            debug!(operation, %error, "queue operation failed");
            false
        }
    }
}

/// Creates an empty queue, or `None` if it cannot be allocated.
pub fn new() -> Option<Queue> {
    Queue::try_new().ok()
}

/// Releases the queue and every element it still holds.
pub fn free(queue: Option<Queue>) {
    if let Some(queue) = queue {
        queue.free();
    }
}

/// Inserts a copy of `value` at the head.
pub fn insert_head(queue: Option<&mut Queue>, value: Option<&str>) -> bool {
    let outcome = require(queue, "queue")
        .and_then(|queue| queue.insert_head(require(value, "value")?));
    succeeded("insert_head", outcome)
}

/// Inserts a copy of `value` at the tail.
pub fn insert_tail(queue: Option<&mut Queue>, value: Option<&str>) -> bool {
    let outcome = require(queue, "queue")
        .and_then(|queue| queue.insert_tail(require(value, "value")?));
    succeeded("insert_tail", outcome)
}

/// Detaches the first element, copying its value into `buffer` if given.
pub fn remove_head(queue: Option<&mut Queue>, buffer: Option<&mut [u8]>) -> Option<Element> {
    queue?.remove_head(buffer)
}

/// Detaches the last element, copying its value into `buffer` if given.
pub fn remove_tail(queue: Option<&mut Queue>, buffer: Option<&mut [u8]>) -> Option<Element> {
    queue?.remove_tail(buffer)
}

/// Releases an element previously handed out by a removal.
pub fn release_element(element: Option<Element>) {
    drop(element);
}

/// Number of elements; 0 for an absent queue.
pub fn size(queue: Option<&Queue>) -> usize {
    queue.map_or(0, Queue::size)
}

/// Deletes the middle element.
pub fn delete_mid(queue: Option<&mut Queue>) -> bool {
    let outcome = require(queue, "queue").and_then(Queue::delete_mid);
    succeeded("delete_mid", outcome)
}

/// Deletes every element sharing its value with a neighbour.
pub fn delete_dup(queue: Option<&mut Queue>) -> bool {
    let outcome = require(queue, "queue").and_then(Queue::delete_dup);
    succeeded("delete_dup", outcome)
}

/// Swaps every two adjacent elements.
pub fn swap(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.swap();
    }
}

/// Reverses the queue.
pub fn reverse(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.reverse();
    }
}

/// Reverses each consecutive group of `k` elements.
pub fn reverse_k(queue: Option<&mut Queue>, k: usize) {
    if let Some(queue) = queue {
        queue.reverse_k(k);
    }
}

/// Sorts the queue, descending when `descending` is set.
pub fn sort(queue: Option<&mut Queue>, descending: bool) {
    if let Some(queue) = queue {
        queue.sort(SortOrder::from_descending(descending));
    }
}

/// Keeps a non-decreasing subsequence; returns the resulting size.
pub fn ascend(queue: Option<&mut Queue>) -> usize {
    queue.map_or(0, Queue::ascend)
}

/// Keeps a non-increasing subsequence; returns the resulting size.
pub fn descend(queue: Option<&mut Queue>) -> usize {
    queue.map_or(0, Queue::descend)
}

/// Merges every queue of the chain into its first queue, sorted. Returns the
/// total element count, 0 for an absent or empty chain.
pub fn merge(chain: Option<&mut QueueChain>, descending: bool) -> usize {
    chain.map_or(0, |chain| chain.merge(SortOrder::from_descending(descending)))
}
