//! Chains of queues and the multi-queue merge.
//!
//! A [`QueueChain`] holds any number of queues whose elements share one
//! arena, so moving a whole queue from one context to another is a single
//! O(1) splice. Each queue is described by a [`QueueContext`] that caches its
//! element count, and the contexts themselves are linked into a ring (the
//! chain) in creation order.
//!
//! Every chain carries a process-unique id, and each [`ContextId`] it hands
//! out is tagged with that id. A handle is only accepted by the chain that
//! issued it.
//!
//! [`QueueChain::merge`] concatenates every queue onto the first one and then
//! sorts the result once. With N elements in total this costs O(N log N)
//! regardless of how the elements were distributed.
//!
//! # Examples
//!
//! ```rust
//! use ringqueue::{QueueChain, SortOrder};
//!
//! let mut chain = QueueChain::from_queues([["1", "3"], ["2", "4"]]).unwrap();
//! let first = chain.first().unwrap();
//!
//! assert_eq!(chain.merge(SortOrder::Ascending), 4);
//! assert_eq!(
//!     chain.values(first).unwrap().collect::<Vec<_>>(),
//!     vec!["1", "2", "3", "4"]
//! );
//!
//! let merged = chain.take(first).unwrap();
//! assert_eq!(merged.size(), 4);
//! assert_eq!(chain.size(first), Ok(0));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tracing::debug;

use crate::error::QueueError;
use crate::queue::{Element, Iter, Queue, allocate_element, detach_element};
use crate::ring::{NodeId, Ring, SortOrder};

static NEXT_CHAIN_ID: AtomicU64 = AtomicU64::new(0);

fn next_chain_id() -> u64 {
    NEXT_CHAIN_ID.fetch_add(1, AtomicOrdering::Relaxed)
}

/// Handle to one queue inside a [`QueueChain`].
///
/// Bound to the chain that issued it; every other chain, clones included,
/// answers it with [`QueueError::UnknownContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId {
    chain: u64,
    node: NodeId,
}

/// One queue of a chain: its sentinel in the shared element arena and its
/// cached element count.
#[derive(Debug, Clone)]
pub struct QueueContext {
    queue: NodeId,
    size: usize,
}

impl QueueContext {
    /// Cached number of elements in this queue.
    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }
}

/// A collection of string queues sharing one element arena.
pub struct QueueChain {
    id: u64,
    elements: Ring<String>,
    contexts: Ring<QueueContext>,
    chain: NodeId,
}

// =============================================================================
// Construction
// =============================================================================

impl QueueChain {
    /// Creates a chain with no queues.
    #[must_use]
    pub fn new() -> Self {
        let mut contexts = Ring::new();
        let chain = contexts.sentinel();
        Self {
            id: next_chain_id(),
            elements: Ring::new(),
            contexts,
            chain,
        }
    }

    /// Builds a chain holding one queue per inner iterator, in order.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::AllocationFailure`] if any queue or element
    /// cannot be allocated.
    pub fn from_queues<I, Q, S>(queues: I) -> Result<Self, QueueError>
    where
        I: IntoIterator<Item = Q>,
        Q: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut chain = Self::new();
        for values in queues {
            let context = chain.add_queue()?;
            for value in values {
                chain.insert_tail(context, value.as_ref())?;
            }
        }
        Ok(chain)
    }

    /// Appends a new empty queue to the chain.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::AllocationFailure`] if the queue's sentinel or
    /// its context cannot be allocated; the chain is unchanged.
    pub fn add_queue(&mut self) -> Result<ContextId, QueueError> {
        let queue = self.elements.try_sentinel().map_err(|_| QueueError::AllocationFailure {
            operation: "add_queue",
        })?;
        match self.contexts.try_allocate(QueueContext { queue, size: 0 }) {
            Ok(node) => {
                self.contexts.link_before(node, self.chain);
                Ok(self.handle(node))
            }
            Err(_) => {
                self.elements.release(queue);
                Err(QueueError::AllocationFailure {
                    operation: "add_queue",
                })
            }
        }
    }

    /// Appends `queue` to the chain as a new context, moving its strings
    /// into the shared arena without copying them.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::AllocationFailure`] if the arena cannot make
    /// room; `queue` is dropped and the chain is unchanged.
    pub fn push_queue(&mut self, mut queue: Queue) -> Result<ContextId, QueueError> {
        let size = queue.size();
        self.elements
            .try_reserve(size.saturating_add(1))
            .map_err(|_| QueueError::AllocationFailure {
                operation: "push_queue",
            })?;
        let id = self.add_queue()?;
        let sentinel = self.context(id)?.queue;

        while let Some(element) = queue.remove_head(None) {
            let node = self.elements.allocate(element.into_value());
            self.elements.link_before(node, sentinel);
        }
        self.context_mut(id)?.size = size;
        Ok(id)
    }

    const fn handle(&self, node: NodeId) -> ContextId {
        ContextId {
            chain: self.id,
            node,
        }
    }

    fn context(&self, id: ContextId) -> Result<&QueueContext, QueueError> {
        if id.chain != self.id {
            return Err(QueueError::UnknownContext);
        }
        self.contexts.get(id.node).ok_or(QueueError::UnknownContext)
    }

    fn context_mut(&mut self, id: ContextId) -> Result<&mut QueueContext, QueueError> {
        if id.chain != self.id {
            return Err(QueueError::UnknownContext);
        }
        self.contexts
            .get_mut(id.node)
            .ok_or(QueueError::UnknownContext)
    }
}

// =============================================================================
// Per-queue operations
// =============================================================================

impl QueueChain {
    /// Inserts a copy of `value` at the head of the queue `id`.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::UnknownContext`] for a foreign handle and
    /// [`QueueError::AllocationFailure`] if the element cannot be stored.
    pub fn insert_head(&mut self, id: ContextId, value: &str) -> Result<(), QueueError> {
        let queue = self.context(id)?.queue;
        let node = allocate_element(&mut self.elements, "insert_head", value)?;
        self.elements.link_after(node, queue);
        self.context_mut(id)?.size += 1;
        Ok(())
    }

    /// Inserts a copy of `value` at the tail of the queue `id`.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::UnknownContext`] for a foreign handle and
    /// [`QueueError::AllocationFailure`] if the element cannot be stored.
    pub fn insert_tail(&mut self, id: ContextId, value: &str) -> Result<(), QueueError> {
        let queue = self.context(id)?.queue;
        let node = allocate_element(&mut self.elements, "insert_tail", value)?;
        self.elements.link_before(node, queue);
        self.context_mut(id)?.size += 1;
        Ok(())
    }

    /// Detaches the first element of the queue `id`, copying its value into
    /// `buffer` as [`Queue::remove_head`] does.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::UnknownContext`] for a foreign handle.
    pub fn remove_head(
        &mut self,
        id: ContextId,
        buffer: Option<&mut [u8]>,
    ) -> Result<Option<Element>, QueueError> {
        let queue = self.context(id)?.queue;
        let node = self.elements.first(queue);
        self.detach(id, node, buffer)
    }

    /// Detaches the last element of the queue `id`.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::UnknownContext`] for a foreign handle.
    pub fn remove_tail(
        &mut self,
        id: ContextId,
        buffer: Option<&mut [u8]>,
    ) -> Result<Option<Element>, QueueError> {
        let queue = self.context(id)?.queue;
        let node = self.elements.last(queue);
        self.detach(id, node, buffer)
    }

    fn detach(
        &mut self,
        id: ContextId,
        node: Option<NodeId>,
        buffer: Option<&mut [u8]>,
    ) -> Result<Option<Element>, QueueError> {
        let Some(element) = node.and_then(|node| detach_element(&mut self.elements, node, buffer))
        else {
            return Ok(None);
        };
        let context = self.context_mut(id)?;
        context.size = context.size.saturating_sub(1);
        Ok(Some(element))
    }

    /// Releases every element of the queue `id`, leaving the context in the
    /// chain with a cached size of zero. Returns how many were released.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::UnknownContext`] for a foreign handle.
    pub fn clear(&mut self, id: ContextId) -> Result<usize, QueueError> {
        let queue = self.context(id)?.queue;
        let released = self.elements.clear(queue);
        self.context_mut(id)?.size = 0;
        Ok(released)
    }

    /// Moves every element of the queue `id` out into a standalone
    /// [`Queue`], leaving the context empty. The strings are moved, not
    /// copied.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::UnknownContext`] for a foreign handle.
    pub fn take(&mut self, id: ContextId) -> Result<Queue, QueueError> {
        let (sentinel, size) = {
            let context = self.context(id)?;
            (context.queue, context.size)
        };

        let mut queue = Queue::with_capacity(size);
        while let Some(node) = self.elements.first(sentinel) {
            if let Some(value) = self.elements.remove(node) {
                queue.push_owned(value);
            }
        }
        self.context_mut(id)?.size = 0;
        Ok(queue)
    }

    /// Cached element count of the queue `id`.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::UnknownContext`] for a foreign handle.
    pub fn size(&self, id: ContextId) -> Result<usize, QueueError> {
        self.context(id).map(QueueContext::size)
    }

    /// Iterates the values of the queue `id` from head to tail.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::UnknownContext`] for a foreign handle.
    pub fn values(&self, id: ContextId) -> Result<Iter<'_>, QueueError> {
        let queue = self.context(id)?.queue;
        Ok(Iter::new(self.elements.iter(queue)))
    }
}

// =============================================================================
// Whole-chain operations
// =============================================================================

impl QueueChain {
    /// The first context, which receives the result of [`QueueChain::merge`].
    pub fn first(&self) -> Option<ContextId> {
        self.contexts
            .first(self.chain)
            .map(|node| self.handle(node))
    }

    /// Iterates the context handles in chain order.
    pub fn contexts(&self) -> impl DoubleEndedIterator<Item = ContextId> + '_ {
        self.contexts
            .nodes(self.chain)
            .map(move |node| self.handle(node))
    }

    /// Number of queues in the chain.
    pub fn len(&self) -> usize {
        self.contexts.len_of(self.chain)
    }

    /// Returns `true` if the chain holds no queues.
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty(self.chain)
    }

    /// Moves every element of every queue onto the first queue and sorts it
    /// by byte-wise string order.
    ///
    /// The other queues are left empty with a cached size of zero. Returns
    /// the total number of elements, or 0 if the chain holds no queues.
    pub fn merge(&mut self, order: SortOrder) -> usize {
        self.merge_by(order, |left, right| left.cmp(right))
    }

    /// [`QueueChain::merge`] with a caller-supplied comparison. The sort is
    /// stable: equal elements keep their chain order, first queue first.
    pub fn merge_by<F>(&mut self, order: SortOrder, mut compare: F) -> usize
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        let Some(first) = self.contexts.first(self.chain) else {
            return 0;
        };
        let Some((accumulator, mut total)) = self
            .contexts
            .get(first)
            .map(|context| (context.queue, context.size))
        else {
            return 0;
        };

        let mut merged = 1;
        let mut current = self.contexts.next(first);
        while current != self.chain {
            if let Some(context) = self.contexts.get_mut(current) {
                total += context.size;
                context.size = 0;
                self.elements.splice_tail_init(context.queue, accumulator);
                merged += 1;
            }
            current = self.contexts.next(current);
        }

        self.elements
            .sort_by(accumulator, order, |left, right| compare(left, right));
        if let Some(context) = self.contexts.get_mut(first) {
            context.size = total;
        }

        debug!(queues = merged, total, ?order, "queues merged");
        total
    }

    /// Verifies the chain ring and every queue ring, and that every cached
    /// size matches its queue.
    pub fn is_well_formed(&self) -> bool {
        self.contexts.is_well_formed(self.chain)
            && self.contexts.iter(self.chain).all(|context| {
                self.elements.is_well_formed(context.queue)
                    && self.elements.len_of(context.queue) == context.size
            })
    }
}

impl Default for QueueChain {
    fn default() -> Self {
        Self::new()
    }
}

/// The clone is a separate chain with its own id: handles issued by the
/// original are not accepted by it.
impl Clone for QueueChain {
    fn clone(&self) -> Self {
        Self {
            id: next_chain_id(),
            elements: self.elements.clone(),
            contexts: self.contexts.clone(),
            chain: self.chain,
        }
    }
}

impl fmt::Debug for QueueChain {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_list()
            .entries(self.contexts.iter(self.chain).map(|context| {
                Iter::new(self.elements.iter(context.queue)).collect::<Vec<_>>()
            }))
            .finish()
    }
}
