//! Arena-backed intrusive rings.
//!
//! A [`Ring`] is an arena of link nodes addressed by [`NodeId`] handles.
//! Any number of independent circular doubly-linked rings can live in one
//! arena: each ring is anchored by a *sentinel* node that carries no payload,
//! and every other node on the ring carries exactly one value.
//!
//! ```text
//!        ┌────────────────────────────────────────────────┐
//!        ↓                                                │
//!   ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐
//!   │ sentinel │ ─→ │  node 0  │ ─→ │  node 1  │ ─→ │  node 2  │
//!   │ (empty)  │ ←─ │ payload  │ ←─ │ payload  │ ←─ │ payload  │
//!   └──────────┘    └──────────┘    └──────────┘    └──────────┘
//!        │                                                ↑
//!        └────────────────────────────────────────────────┘
//! ```
//!
//! All link primitives are O(1) and never traverse: insert-after,
//! insert-before, unlink, move, cut-position and the splice family. Released
//! slots are threaded onto an intrusive free list and recycled by later
//! allocations, so handles stay stable for as long as a node is live.
//!
//! The whole-ring algorithms (pairwise swap, reversal, k-group reversal,
//! merge sort, duplicate and monotonic filtering) are built from these
//! primitives in the `transform`, `sort` and `filter` submodules.
//!
//! # Examples
//!
//! ```rust
//! use ringqueue::ring::Ring;
//!
//! let mut ring = Ring::new();
//! let head = ring.sentinel();
//!
//! for value in [3, 1, 2] {
//!     let node = ring.allocate(value);
//!     ring.link_before(node, head);
//! }
//!
//! assert_eq!(ring.iter(head).copied().collect::<Vec<_>>(), vec![3, 1, 2]);
//! assert_eq!(ring.len_of(head), 3);
//! assert!(ring.is_well_formed(head));
//! ```

mod filter;
mod sort;
mod transform;

pub use sort::SortOrder;

use std::collections::TryReserveError;
use std::fmt;
use std::iter::FusedIterator;

/// Stable handle to a node inside a [`Ring`].
///
/// A handle stays valid until the node it names is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone)]
enum Slot<T> {
    Sentinel,
    Occupied(T),
    Vacant { next_free: Option<usize> },
}

#[derive(Clone)]
struct Node<T> {
    next: usize,
    prev: usize,
    slot: Slot<T>,
}

/// An arena of ring nodes.
///
/// # Invariants
///
/// For every linked node `n`: `n.next.prev == n` and `n.prev.next == n`.
/// A detached node is self-linked. Sentinels never hold a value.
#[derive(Clone)]
pub struct Ring<T> {
    nodes: Vec<Node<T>>,
    free: Option<usize>,
    live: usize,
}

// =============================================================================
// Allocation
// =============================================================================

impl<T> Ring<T> {
    /// Creates an empty arena.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: None,
            live: 0,
        }
    }

    /// Creates an empty arena with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: None,
            live: 0,
        }
    }

    /// Number of slots currently claimed, sentinels included.
    #[inline]
    pub const fn live(&self) -> usize {
        self.live
    }

    fn claim(&mut self, slot: Slot<T>) -> usize {
        if let Some(index) = self.free {
            let node = &mut self.nodes[index];
            debug_assert!(matches!(node.slot, Slot::Vacant { .. }));
            self.free = if let Slot::Vacant { next_free } = node.slot {
                next_free
            } else {
                None
            };
            *node = Node {
                next: index,
                prev: index,
                slot,
            };
            self.live += 1;
            return index;
        }

        let index = self.nodes.len();
        self.nodes.push(Node {
            next: index,
            prev: index,
            slot,
        });
        self.live += 1;
        index
    }

    fn try_claim(&mut self, slot: Slot<T>) -> Result<usize, TryReserveError> {
        if self.free.is_none() {
            self.nodes.try_reserve(1)?;
        }
        Ok(self.claim(slot))
    }

    /// Allocates a self-linked sentinel, i.e. a new empty ring.
    pub fn sentinel(&mut self) -> NodeId {
        NodeId(self.claim(Slot::Sentinel))
    }

    /// Fallible variant of [`Ring::sentinel`].
    ///
    /// # Errors
    ///
    /// Returns the reservation error if the arena cannot grow.
    pub fn try_sentinel(&mut self) -> Result<NodeId, TryReserveError> {
        self.try_claim(Slot::Sentinel).map(NodeId)
    }

    /// Allocates a detached, self-linked node carrying `value`.
    pub fn allocate(&mut self, value: T) -> NodeId {
        NodeId(self.claim(Slot::Occupied(value)))
    }

    /// Fallible variant of [`Ring::allocate`]. On failure `value` is dropped
    /// and the arena is unchanged.
    ///
    /// # Errors
    ///
    /// Returns the reservation error if the arena cannot grow.
    pub fn try_allocate(&mut self, value: T) -> Result<NodeId, TryReserveError> {
        self.try_claim(Slot::Occupied(value)).map(NodeId)
    }

    /// Reserves room for at least `additional` more nodes.
    ///
    /// # Errors
    ///
    /// Returns the reservation error if the arena cannot grow.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.nodes.try_reserve(additional)
    }

    /// Returns a detached node (or an empty sentinel) to the free list,
    /// handing back its payload if it had one.
    ///
    /// The node must not be linked into a ring with other nodes.
    /// [`Ring::remove`] unlinks first.
    pub(crate) fn release(&mut self, node: NodeId) -> Option<T> {
        let free = self.free;
        let entry = self.nodes.get_mut(node.0)?;
        debug_assert!(entry.next == node.0 && entry.prev == node.0);
        match std::mem::replace(&mut entry.slot, Slot::Vacant { next_free: free }) {
            Slot::Vacant { next_free } => {
                entry.slot = Slot::Vacant { next_free };
                None
            }
            Slot::Sentinel => {
                self.free = Some(node.0);
                self.live -= 1;
                None
            }
            Slot::Occupied(value) => {
                self.free = Some(node.0);
                self.live -= 1;
                Some(value)
            }
        }
    }

    /// Unlinks `node` and releases it.
    pub fn remove(&mut self, node: NodeId) -> Option<T> {
        self.unlink(node);
        self.release(node)
    }
}

impl<T> Default for Ring<T> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Access
// =============================================================================

impl<T> Ring<T> {
    /// Returns the payload of `node`, or `None` for sentinels and released
    /// slots.
    #[inline]
    pub fn get(&self, node: NodeId) -> Option<&T> {
        match &self.nodes.get(node.0)?.slot {
            Slot::Occupied(value) => Some(value),
            Slot::Sentinel | Slot::Vacant { .. } => None,
        }
    }

    /// Mutable variant of [`Ring::get`].
    #[inline]
    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut T> {
        match &mut self.nodes.get_mut(node.0)?.slot {
            Slot::Occupied(value) => Some(value),
            Slot::Sentinel | Slot::Vacant { .. } => None,
        }
    }

    /// Returns `true` if `node` is a live sentinel.
    #[inline]
    pub fn is_sentinel(&self, node: NodeId) -> bool {
        self.nodes
            .get(node.0)
            .is_some_and(|entry| matches!(entry.slot, Slot::Sentinel))
    }

    /// The node after `node`.
    #[inline]
    pub fn next(&self, node: NodeId) -> NodeId {
        NodeId(self.nodes[node.0].next)
    }

    /// The node before `node`.
    #[inline]
    pub fn prev(&self, node: NodeId) -> NodeId {
        NodeId(self.nodes[node.0].prev)
    }

    /// Returns `true` if the ring anchored at `head` holds no nodes.
    #[inline]
    pub fn is_empty(&self, head: NodeId) -> bool {
        self.next(head) == head
    }

    /// Returns `true` if the ring anchored at `head` holds exactly one node.
    #[inline]
    pub fn is_singular(&self, head: NodeId) -> bool {
        !self.is_empty(head) && self.next(head) == self.prev(head)
    }

    /// First node of the ring anchored at `head`.
    #[inline]
    pub fn first(&self, head: NodeId) -> Option<NodeId> {
        let first = self.next(head);
        (first != head).then_some(first)
    }

    /// Last node of the ring anchored at `head`.
    #[inline]
    pub fn last(&self, head: NodeId) -> Option<NodeId> {
        let last = self.prev(head);
        (last != head).then_some(last)
    }

    /// Counts the nodes of the ring anchored at `head`. O(n).
    pub fn len_of(&self, head: NodeId) -> usize {
        self.nodes(head).count()
    }

    /// Iterates the node handles of the ring anchored at `head`.
    pub fn nodes(&self, head: NodeId) -> Nodes<'_, T> {
        Nodes {
            ring: self,
            front: self.next(head),
            back: self.prev(head),
            finished: self.is_empty(head),
        }
    }

    /// Iterates the payloads of the ring anchored at `head`.
    pub fn iter(&self, head: NodeId) -> Iter<'_, T> {
        Iter {
            nodes: self.nodes(head),
        }
    }

    /// Verifies the link invariants of the ring anchored at `head`.
    ///
    /// Checks that `head` is a sentinel, that every node on the ring is
    /// occupied, that `next`/`prev` agree at every step, and that forward
    /// and backward traversal both return to `head` after the same number
    /// of steps.
    pub fn is_well_formed(&self, head: NodeId) -> bool {
        if !self.is_sentinel(head) {
            return false;
        }
        let bound = self.nodes.len();

        let mut forward = 0;
        let mut current = head;
        loop {
            let Some(entry) = self.nodes.get(current.0) else {
                return false;
            };
            let Some(next) = self.nodes.get(entry.next) else {
                return false;
            };
            if next.prev != current.0 {
                return false;
            }
            current = NodeId(entry.next);
            if current == head {
                break;
            }
            if !matches!(next.slot, Slot::Occupied(_)) || forward == bound {
                return false;
            }
            forward += 1;
        }

        let mut backward = 0;
        let mut current = self.prev(head);
        while current != head {
            if backward == bound {
                return false;
            }
            backward += 1;
            current = self.prev(current);
        }

        forward == backward
    }
}

// =============================================================================
// Link primitives
// =============================================================================

impl<T> Ring<T> {
    #[inline]
    fn set_next(&mut self, node: NodeId, next: NodeId) {
        self.nodes[node.0].next = next.0;
    }

    #[inline]
    fn set_prev(&mut self, node: NodeId, prev: NodeId) {
        self.nodes[node.0].prev = prev.0;
    }

    #[inline]
    fn join(&mut self, prev: NodeId, next: NodeId) {
        self.set_next(prev, next);
        self.set_prev(next, prev);
    }

    fn link_between(&mut self, node: NodeId, prev: NodeId, next: NodeId) {
        self.join(node, next);
        self.join(prev, node);
    }

    /// Self-links `head`, forgetting whatever it pointed to.
    #[inline]
    pub fn reset(&mut self, head: NodeId) {
        self.join(head, head);
    }

    /// Links the detached `node` directly after `anchor`.
    pub fn link_after(&mut self, node: NodeId, anchor: NodeId) {
        let next = self.next(anchor);
        self.link_between(node, anchor, next);
    }

    /// Links the detached `node` directly before `anchor`.
    pub fn link_before(&mut self, node: NodeId, anchor: NodeId) {
        let prev = self.prev(anchor);
        self.link_between(node, prev, anchor);
    }

    /// Detaches `node` from its ring, leaving it self-linked.
    pub fn unlink(&mut self, node: NodeId) {
        let prev = self.prev(node);
        let next = self.next(node);
        self.join(prev, next);
        self.reset(node);
    }

    /// Moves `node` to directly after `anchor`.
    pub fn move_after(&mut self, node: NodeId, anchor: NodeId) {
        self.unlink(node);
        self.link_after(node, anchor);
    }

    /// Moves `node` to directly before `anchor`.
    pub fn move_before(&mut self, node: NodeId, anchor: NodeId) {
        self.unlink(node);
        self.link_before(node, anchor);
    }

    /// Exchanges the forward and backward links of `node`.
    #[inline]
    pub fn exchange_links(&mut self, node: NodeId) {
        let entry = &mut self.nodes[node.0];
        std::mem::swap(&mut entry.next, &mut entry.prev);
    }

    /// Moves the nodes from the start of `head` up to and including
    /// `boundary` onto the empty ring `into`.
    ///
    /// `boundary` must be on the ring anchored at `head`. When `boundary`
    /// is `head` itself, `into` is left empty.
    pub fn cut_position(&mut self, into: NodeId, head: NodeId, boundary: NodeId) {
        debug_assert!(self.is_empty(into));
        if self.is_empty(head) || boundary == head {
            self.reset(into);
            return;
        }

        let first = self.next(head);
        let rest = self.next(boundary);
        self.join(into, first);
        self.join(boundary, into);
        self.join(head, rest);
    }

    fn splice_between(&mut self, list: NodeId, prev: NodeId, next: NodeId) {
        let first = self.next(list);
        let last = self.prev(list);
        self.join(prev, first);
        self.join(last, next);
    }

    /// Moves every node of `list` to the front of `head`.
    ///
    /// `list`'s sentinel still points at the moved nodes afterwards; use
    /// [`Ring::splice_init`] to leave it empty.
    pub fn splice(&mut self, list: NodeId, head: NodeId) {
        if !self.is_empty(list) {
            let next = self.next(head);
            self.splice_between(list, head, next);
        }
    }

    /// Moves every node of `list` to the back of `head`.
    pub fn splice_tail(&mut self, list: NodeId, head: NodeId) {
        if !self.is_empty(list) {
            let prev = self.prev(head);
            self.splice_between(list, prev, head);
        }
    }

    /// [`Ring::splice`], then resets `list` to empty.
    pub fn splice_init(&mut self, list: NodeId, head: NodeId) {
        if !self.is_empty(list) {
            self.splice(list, head);
            self.reset(list);
        }
    }

    /// [`Ring::splice_tail`], then resets `list` to empty.
    pub fn splice_tail_init(&mut self, list: NodeId, head: NodeId) {
        if !self.is_empty(list) {
            self.splice_tail(list, head);
            self.reset(list);
        }
    }

    /// Unlinks and releases every node of the ring anchored at `head`,
    /// returning how many payloads were dropped. `head` stays live and empty.
    pub fn clear(&mut self, head: NodeId) -> usize {
        let mut released = 0;
        while let Some(node) = self.first(head) {
            drop(self.remove(node));
            released += 1;
        }
        released
    }
}

impl<T: fmt::Debug> fmt::Debug for Ring<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Ring")
            .field("slots", &self.nodes.len())
            .field("live", &self.live)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Double-ended iterator over the node handles of one ring.
pub struct Nodes<'a, T> {
    ring: &'a Ring<T>,
    front: NodeId,
    back: NodeId,
    finished: bool,
}

impl<T> Iterator for Nodes<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let node = self.front;
        if node == self.back {
            self.finished = true;
        } else {
            self.front = self.ring.next(node);
        }
        Some(node)
    }
}

impl<T> DoubleEndedIterator for Nodes<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let node = self.back;
        if node == self.front {
            self.finished = true;
        } else {
            self.back = self.ring.prev(node);
        }
        Some(node)
    }
}

impl<T> FusedIterator for Nodes<'_, T> {}

/// Double-ended iterator over the payloads of one ring.
pub struct Iter<'a, T> {
    nodes: Nodes<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let ring = self.nodes.ring;
        self.nodes.next().and_then(|node| ring.get(node))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let ring = self.nodes.ring;
        self.nodes.next_back().and_then(|node| ring.get(node))
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

// =============================================================================
// Tests
// =============================================================================
