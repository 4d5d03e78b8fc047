//! # ringqueue
//!
//! A double-ended queue of strings built directly on an intrusive circular
//! doubly-linked list, with whole-structure algorithms that work purely by
//! relinking nodes.
//!
//! ## Overview
//!
//! - **Ring engine** ([`ring`]): an arena of link nodes addressed by stable
//!   handles, with O(1) link, unlink, cut and splice primitives. Generic over
//!   the payload type.
//! - **Queue** ([`Queue`]): insertion and removal at both ends, O(n) size,
//!   middle deletion, duplicate-run deletion, pairwise swap, reversal,
//!   k-group reversal, stable merge sort and monotonic filtering.
//! - **Chains** ([`QueueChain`]): several queues sharing one arena, merged
//!   into the first by concatenation and a single sort.
//! - **Facade** ([`api`]): the same operations over optional handles,
//!   answering with flags, counts and optional elements.
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`Queue`] (as a sequence of
//!   strings) and [`SortOrder`].
//!
//! ## Example
//!
//! ```rust
//! use ringqueue::prelude::*;
//!
//! let mut queue: Queue = ["3", "1", "4", "1", "5"].into_iter().collect();
//! assert_eq!(queue.ascend(), 3);
//! assert_eq!(queue.iter().collect::<Vec<_>>(), vec!["1", "1", "5"]);
//!
//! queue.sort(SortOrder::Descending);
//! assert_eq!(queue.iter().collect::<Vec<_>>(), vec!["5", "1", "1"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// ```rust
/// use ringqueue::prelude::*;
/// ```
pub mod prelude {
    pub use crate::chain::{ContextId, QueueChain, QueueContext};
    pub use crate::error::QueueError;
    pub use crate::queue::{Element, Queue};
    pub use crate::ring::{NodeId, Ring, SortOrder};
}

pub mod api;
pub mod ring;

mod chain;
mod error;
mod queue;

pub use chain::{ContextId, QueueChain, QueueContext};
pub use error::QueueError;
pub use queue::{Element, Iter, Queue};
pub use ring::SortOrder;

static_assertions::assert_impl_all!(Queue: Send, Sync, Clone, Default);
static_assertions::assert_impl_all!(QueueChain: Send, Sync, Clone, Default);
static_assertions::assert_impl_all!(Element: Send, Sync);
