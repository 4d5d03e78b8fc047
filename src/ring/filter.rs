//! Filtering passes: middle deletion, duplicate-run removal and monotonic
//! (ascend/descend) retention.

use std::cmp::Ordering;

use super::{NodeId, Ring};

impl<T> Ring<T> {
    /// Locates the middle node with a slow/fast pointer pair. For an even
    /// length this is the later of the two central nodes (index `n / 2`).
    pub fn middle(&self, head: NodeId) -> Option<NodeId> {
        let mut slow = self.first(head)?;
        let mut fast = slow;
        while fast != head && self.next(fast) != head {
            fast = self.next(self.next(fast));
            slow = self.next(slow);
        }
        Some(slow)
    }

    /// Removes the middle node and hands back its payload.
    pub fn delete_mid(&mut self, head: NodeId) -> Option<T> {
        let middle = self.middle(head)?;
        self.remove(middle)
    }

    /// Removes every node whose value equals an adjacent node's value, the
    /// whole run included. Assumes equal values are adjacent (e.g. sorted).
    /// Returns the number of nodes removed.
    pub fn remove_duplicate_runs(&mut self, head: NodeId) -> usize
    where
        T: PartialEq,
    {
        let mut removed = 0;
        let mut pending = false;
        let mut current = self.next(head);

        while current != head {
            let following = self.next(current);
            let duplicate = following != head && self.get(current) == self.get(following);
            if duplicate || pending {
                self.remove(current);
                removed += 1;
            }
            pending = duplicate;
            current = following;
        }

        removed
    }

    /// Scans from the tail backwards, keeping a node only when `keep(node,
    /// anchor)` holds for the nearest kept node to its right. Returns the
    /// number of nodes removed.
    fn retain_monotonic<F>(&mut self, head: NodeId, mut keep: F) -> usize
    where
        F: FnMut(&T, &T) -> bool,
    {
        let Some(mut anchor) = self.last(head) else {
            return 0;
        };
        let mut removed = 0;

        loop {
            let candidate = self.prev(anchor);
            if candidate == head {
                break;
            }
            let kept = match (self.get(candidate), self.get(anchor)) {
                (Some(value), Some(bound)) => keep(value, bound),
                _ => true,
            };
            if kept {
                anchor = candidate;
            } else {
                self.remove(candidate);
                removed += 1;
            }
        }

        removed
    }

    /// Deletes every node that has a strictly smaller node anywhere to its
    /// right under `compare`, leaving a non-decreasing sequence. Returns the
    /// resulting length.
    pub fn ascend_by<F>(&mut self, head: NodeId, mut compare: F) -> usize
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.retain_monotonic(head, |value, minimum| {
            compare(value, minimum) != Ordering::Greater
        });
        self.len_of(head)
    }

    /// Deletes every node that has a strictly larger node anywhere to its
    /// right under `compare`, leaving a non-increasing sequence. Returns the
    /// resulting length.
    pub fn descend_by<F>(&mut self, head: NodeId, mut compare: F) -> usize
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.retain_monotonic(head, |value, maximum| {
            compare(value, maximum) != Ordering::Less
        });
        self.len_of(head)
    }
}

impl<T: Ord> Ring<T> {
    /// [`Ring::ascend_by`] with `T`'s ordering.
    pub fn ascend(&mut self, head: NodeId) -> usize {
        self.ascend_by(head, Ord::cmp)
    }

    /// [`Ring::descend_by`] with `T`'s ordering.
    pub fn descend(&mut self, head: NodeId) -> usize {
        self.descend_by(head, Ord::cmp)
    }
}
