//! Structural transforms: pairwise swap, reversal and k-group reversal.
//!
//! None of these allocate or touch payloads; they only rewire links.

use super::{NodeId, Ring};

impl<T> Ring<T> {
    /// Swaps every two adjacent nodes: (1,2), (3,4), ... An unpaired trailing
    /// node stays where it is.
    pub fn swap_pairs(&mut self, head: NodeId) {
        let mut first = self.next(head);
        let mut second = self.next(first);

        while first != head && second != head {
            let before = self.prev(first);
            let after = self.next(second);

            self.join(before, second);
            self.join(second, first);
            self.join(first, after);

            first = after;
            second = self.next(first);
        }
    }

    /// Reverses the ring by exchanging the links of every node, the
    /// sentinel included.
    pub fn reverse(&mut self, head: NodeId) {
        let mut current = head;
        loop {
            let following = self.next(current);
            self.exchange_links(current);
            current = following;
            if current == head {
                break;
            }
        }
    }

    /// Reverses each consecutive run of exactly `k` nodes in place.
    ///
    /// A trailing run shorter than `k` keeps its order. Returns the number of
    /// runs reversed; `k == 0` reverses nothing.
    pub fn reverse_k(&mut self, head: NodeId, k: usize) -> usize {
        if k == 0 {
            return 0;
        }

        let mut remaining = self.len_of(head);
        let mut before = head;
        let mut runs = 0;

        while remaining >= k {
            let start = self.next(before);
            let mut current = start;
            let mut last = start;

            for _ in 0..k {
                let following = self.next(current);
                self.exchange_links(current);
                last = current;
                current = following;
            }

            // `last` is the run's new first node, `start` its new last node.
            self.join(before, last);
            self.join(start, current);

            before = start;
            remaining -= k;
            runs += 1;
        }

        runs
    }
}
