//! Stable in-place merge sort over a ring.
//!
//! Each level bisects the ring with a slow/fast pointer pair, cuts it into
//! two scratch rings, sorts both recursively and merges them back by moving
//! nodes. No payload is ever moved or cloned and no buffer is allocated
//! beyond two scratch sentinels per recursion level, which are recycled
//! through the arena's free list.

use std::cmp::Ordering;

use tracing::trace;

use super::{NodeId, Ring};

/// Direction of a sort or merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortOrder {
    /// Maps the conventional `descending` flag onto a `SortOrder`.
    #[inline]
    pub const fn from_descending(descending: bool) -> Self {
        if descending {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    /// Whether the left candidate wins given `left.cmp(right)`. Ties go left.
    #[inline]
    const fn takes_left(self, ordering: Ordering) -> bool {
        match self {
            Self::Ascending => !matches!(ordering, Ordering::Greater),
            Self::Descending => !matches!(ordering, Ordering::Less),
        }
    }
}

impl<T> Ring<T> {
    /// Sorts the ring anchored at `head` with `compare`. Stable.
    pub fn sort_by<F>(&mut self, head: NodeId, order: SortOrder, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.merge_sort(head, order, &mut compare, 0);
    }

    fn merge_sort<F>(&mut self, head: NodeId, order: SortOrder, compare: &mut F, depth: usize)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if self.is_empty(head) || self.is_singular(head) {
            return;
        }

        let boundary = self.bisect(head);
        let left = self.sentinel();
        let right = self.sentinel();
        self.cut_position(left, head, boundary);
        self.splice_init(head, right);
        trace!(depth, "merge sort split");

        self.merge_sort(left, order, compare, depth + 1);
        self.merge_sort(right, order, compare, depth + 1);
        self.merge_into(head, left, right, order, compare);

        self.release(left);
        self.release(right);
    }

    /// Last node of the left half: `ceil(n / 2)` nodes from the front.
    fn bisect(&self, head: NodeId) -> NodeId {
        let mut slow = self.next(head);
        let mut fast = self.next(slow);
        while fast != head && self.next(fast) != head {
            slow = self.next(slow);
            fast = self.next(self.next(fast));
        }
        slow
    }

    /// Drains the sorted rings `left` and `right` onto the tail of the empty
    /// ring `head`.
    fn merge_into<F>(
        &mut self,
        head: NodeId,
        left: NodeId,
        right: NodeId,
        order: SortOrder,
        compare: &mut F,
    ) where
        F: FnMut(&T, &T) -> Ordering,
    {
        while let (Some(left_front), Some(right_front)) = (self.first(left), self.first(right)) {
            let winner = match (self.get(left_front), self.get(right_front)) {
                (Some(left_value), Some(right_value))
                    if !order.takes_left(compare(left_value, right_value)) =>
                {
                    right_front
                }
                _ => left_front,
            };
            self.move_before(winner, head);
        }

        let rest = if self.is_empty(left) { right } else { left };
        self.splice_tail_init(rest, head);
    }
}

impl<T: Ord> Ring<T> {
    /// Sorts the ring anchored at `head` by `T`'s ordering. Stable.
    pub fn sort(&mut self, head: NodeId, order: SortOrder) {
        self.sort_by(head, order, Ord::cmp);
    }
}
