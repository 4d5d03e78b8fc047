//! The string queue.
//!
//! [`Queue`] is a double-ended queue of owned strings laid out on a single
//! [`Ring`]. Every insertion duplicates the caller's string into storage the
//! queue owns; removal from either end hands an [`Element`] back to the
//! caller, while the filtering operations release what they delete on the
//! spot.
//!
//! # Time Complexity
//!
//! | Operation                        | Complexity   |
//! |----------------------------------|--------------|
//! | `insert_head` / `insert_tail`    | O(m) copy    |
//! | `remove_head` / `remove_tail`    | O(1) + copy  |
//! | `size`                           | O(n)         |
//! | `delete_mid`                     | O(n)         |
//! | `delete_dup`                     | O(n)         |
//! | `swap` / `reverse` / `reverse_k` | O(n)         |
//! | `sort`                           | O(n log n)   |
//! | `ascend` / `descend`             | O(n)         |
//!
//! # Examples
//!
//! ```rust
//! use ringqueue::{Queue, SortOrder};
//!
//! let mut queue = Queue::new();
//! queue.insert_tail("b").unwrap();
//! queue.insert_tail("a").unwrap();
//! queue.insert_tail("c").unwrap();
//!
//! queue.sort(SortOrder::Ascending);
//! assert_eq!(queue.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
//!
//! queue.delete_mid().unwrap();
//! assert_eq!(queue.iter().collect::<Vec<_>>(), vec!["a", "c"]);
//!
//! assert_eq!(queue.free(), 2);
//! ```

use std::fmt;
use std::iter::FusedIterator;
use std::ops::Deref;

use tracing::{debug, warn};

use crate::error::QueueError;
use crate::ring::{self, NodeId, Ring, SortOrder};

// =============================================================================
// Element
// =============================================================================

/// A value detached from a queue. Owns its string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element {
    value: String,
}

impl Element {
    /// The element's value.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the element, returning its string.
    #[inline]
    pub fn into_value(self) -> String {
        self.value
    }
}

impl Deref for Element {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl AsRef<str> for Element {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl From<Element> for String {
    fn from(element: Element) -> Self {
        element.value
    }
}

impl fmt::Display for Element {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.value)
    }
}

// =============================================================================
// Element storage helpers
// =============================================================================

fn duplicate(value: &str) -> Option<String> {
    let mut owned = String::new();
    owned.try_reserve_exact(value.len()).ok()?;
    owned.push_str(value);
    Some(owned)
}

/// Duplicates `value` and places it in a fresh detached node of `ring`.
///
/// Nothing is left behind on failure: a duplicated string whose node could
/// not be reserved is dropped with the failed reservation.
pub(crate) fn allocate_element(
    ring: &mut Ring<String>,
    operation: &'static str,
    value: &str,
) -> Result<NodeId, QueueError> {
    let Some(owned) = duplicate(value) else {
        warn!(operation, length = value.len(), "value duplication failed");
        return Err(QueueError::AllocationFailure { operation });
    };
    ring.try_allocate(owned).map_err(|error| {
        warn!(operation, %error, "node allocation failed");
        QueueError::AllocationFailure { operation }
    })
}

/// Copies `value` into `buffer`, truncated to leave room for a terminating
/// NUL; the rest of the buffer is zeroed. An empty buffer is left untouched.
pub(crate) fn copy_truncated(value: &str, buffer: &mut [u8]) {
    let Some(limit) = buffer.len().checked_sub(1) else {
        return;
    };
    let length = value.len().min(limit);
    buffer[..length].copy_from_slice(&value.as_bytes()[..length]);
    buffer[length..].fill(0);
}

/// Unlinks and releases `node`, copying its value into `buffer` if given.
pub(crate) fn detach_element(
    ring: &mut Ring<String>,
    node: NodeId,
    buffer: Option<&mut [u8]>,
) -> Option<Element> {
    let value = ring.remove(node)?;
    if let Some(buffer) = buffer {
        copy_truncated(&value, buffer);
    }
    Some(Element { value })
}

// =============================================================================
// Queue
// =============================================================================

/// A double-ended queue of owned strings on an intrusive ring.
///
/// The queue keeps no element counter: [`Queue::size`] walks the ring.
#[derive(Clone)]
pub struct Queue {
    ring: Ring<String>,
    head: NodeId,
}

impl Queue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        let mut ring = Ring::new();
        let head = ring.sentinel();
        Self { ring, head }
    }

    /// Creates an empty queue with arena room for `capacity` elements.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut ring = Ring::with_capacity(capacity.saturating_add(1));
        let head = ring.sentinel();
        Self { ring, head }
    }

    /// Links an already owned string at the tail without copying it.
    pub(crate) fn push_owned(&mut self, value: String) {
        let node = self.ring.allocate(value);
        self.ring.link_before(node, self.head);
    }

    /// Creates an empty queue, reporting allocation failure instead of
    /// aborting.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::AllocationFailure`] if the sentinel cannot be
    /// allocated.
    pub fn try_new() -> Result<Self, QueueError> {
        let mut ring = Ring::new();
        let head = ring.try_sentinel().map_err(|error| {
            warn!(operation = "new", %error, "sentinel allocation failed");
            QueueError::AllocationFailure { operation: "new" }
        })?;
        Ok(Self { ring, head })
    }

    /// Inserts a copy of `value` at the head.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::AllocationFailure`] if storage for the element
    /// cannot be reserved; the queue is unchanged.
    pub fn insert_head(&mut self, value: &str) -> Result<(), QueueError> {
        let node = allocate_element(&mut self.ring, "insert_head", value)?;
        self.ring.link_after(node, self.head);
        Ok(())
    }

    /// Inserts a copy of `value` at the tail.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::AllocationFailure`] if storage for the element
    /// cannot be reserved; the queue is unchanged.
    pub fn insert_tail(&mut self, value: &str) -> Result<(), QueueError> {
        let node = allocate_element(&mut self.ring, "insert_tail", value)?;
        self.ring.link_before(node, self.head);
        Ok(())
    }

    /// Detaches the first element.
    ///
    /// If `buffer` is given, the value is also copied into it, truncated to
    /// `buffer.len() - 1` bytes and NUL-terminated.
    pub fn remove_head(&mut self, buffer: Option<&mut [u8]>) -> Option<Element> {
        let node = self.ring.first(self.head)?;
        self.detach(node, buffer)
    }

    /// Detaches the last element. See [`Queue::remove_head`] for `buffer`.
    pub fn remove_tail(&mut self, buffer: Option<&mut [u8]>) -> Option<Element> {
        let node = self.ring.last(self.head)?;
        self.detach(node, buffer)
    }

    fn detach(&mut self, node: NodeId, buffer: Option<&mut [u8]>) -> Option<Element> {
        detach_element(&mut self.ring, node, buffer)
    }

    /// Counts the elements by walking the ring.
    pub fn size(&self) -> usize {
        self.ring.len_of(self.head)
    }

    /// Returns `true` if the queue holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty(self.head)
    }

    /// The first value, if any.
    pub fn front(&self) -> Option<&str> {
        self.ring
            .first(self.head)
            .and_then(|node| self.ring.get(node))
            .map(String::as_str)
    }

    /// The last value, if any.
    pub fn back(&self) -> Option<&str> {
        self.ring
            .last(self.head)
            .and_then(|node| self.ring.get(node))
            .map(String::as_str)
    }

    /// Deletes the middle element: index `n / 2`, so the later of the two
    /// central elements when the length is even.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Empty`] if there is nothing to delete.
    pub fn delete_mid(&mut self) -> Result<(), QueueError> {
        match self.ring.delete_mid(self.head) {
            Some(_released) => Ok(()),
            None => Err(QueueError::Empty),
        }
    }

    /// Deletes every element whose value also appears in an adjacent
    /// element, so that only values unique among their neighbours remain.
    /// The queue is expected to be sorted.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::TooFewElements`] for fewer than two elements.
    pub fn delete_dup(&mut self) -> Result<(), QueueError> {
        if self.ring.is_empty(self.head) || self.ring.is_singular(self.head) {
            return Err(QueueError::TooFewElements {
                required: 2,
                actual: self.size(),
            });
        }
        let removed = self.ring.remove_duplicate_runs(self.head);
        debug!(removed, "duplicate runs deleted");
        Ok(())
    }

    /// Swaps every two adjacent elements.
    pub fn swap(&mut self) {
        self.ring.swap_pairs(self.head);
    }

    /// Reverses the queue in place.
    pub fn reverse(&mut self) {
        self.ring.reverse(self.head);
    }

    /// Reverses each consecutive group of `k` elements; a trailing group
    /// shorter than `k` keeps its order.
    pub fn reverse_k(&mut self, k: usize) {
        let runs = self.ring.reverse_k(self.head, k);
        debug!(k, runs, "k-group reversal");
    }

    /// Stable merge sort by byte-wise string order.
    pub fn sort(&mut self, order: SortOrder) {
        self.ring.sort(self.head, order);
    }

    /// Deletes every element that has a strictly smaller element somewhere to
    /// its right. Returns the remaining size.
    pub fn ascend(&mut self) -> usize {
        let size = self.ring.ascend(self.head);
        debug!(size, "ascend filter applied");
        size
    }

    /// Deletes every element that has a strictly larger element somewhere to
    /// its right. Returns the remaining size.
    pub fn descend(&mut self) -> usize {
        let size = self.ring.descend(self.head);
        debug!(size, "descend filter applied");
        size
    }

    /// Releases every element and the queue itself, returning how many
    /// elements were released.
    pub fn free(mut self) -> usize {
        let released = self.ring.clear(self.head);
        self.ring.release(self.head);
        debug!(released, remaining = self.ring.live(), "queue freed");
        released
    }

    /// Iterates the values from head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.ring.iter(self.head))
    }

    /// Verifies the ring invariants: every link is mirrored and traversal in
    /// both directions returns to the sentinel.
    pub fn is_well_formed(&self) -> bool {
        self.ring.is_well_formed(self.head)
    }

    /// Number of arena slots in use, the sentinel included. A queue holding
    /// `n` elements has `n + 1` live slots.
    pub const fn live_nodes(&self) -> usize {
        self.ring.live()
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Queue {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for Queue {}

impl fmt::Debug for Queue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<S: AsRef<str>> Extend<S> for Queue {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for value in iter {
            self.push_owned(value.as_ref().to_owned());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for Queue {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}

impl<'a> IntoIterator for &'a Queue {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Iterator
// =============================================================================

/// Double-ended iterator over the values of a queue.
pub struct Iter<'a> {
    inner: ring::Iter<'a, String>,
}

impl<'a> Iter<'a> {
    pub(crate) const fn new(inner: ring::Iter<'a, String>) -> Self {
        Self { inner }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(String::as_str)
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(String::as_str)
    }
}

impl FusedIterator for Iter<'_> {}

// =============================================================================
// Serde
// =============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for Queue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
struct QueueVisitor;

#[cfg(feature = "serde")]
impl<'de> serde::de::Visitor<'de> for QueueVisitor {
    type Value = Queue;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence of strings")
    }

    fn visit_seq<A>(self, mut sequence: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut queue = Queue::new();
        while let Some(value) = sequence.next_element::<String>()? {
            queue
                .insert_tail(&value)
                .map_err(serde::de::Error::custom)?;
        }
        Ok(queue)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Queue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(QueueVisitor)
    }
}

// =============================================================================
// Tests
// =============================================================================
