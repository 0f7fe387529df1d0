//! Indexed binary heaps and a capacity-bounded dual-heap priority queue.
//!
//! The key insight: separate storage from structure. Entries live in a slab
//! arena and heaps only coordinate ids into it:
//!
//! ```text
//! Storage (Slab)   - owns entries, provides stable ids
//! Heap<_, MinFirst> / Heap<_, MaxFirst> - order ids, don't own data
//! ```
//!
//! Because every entry records its own position in the heap array, any
//! entry can be removed in O(log n) given only its id. [`BoundedDualHeap`]
//! builds on that: it keeps each item in both a min-heap and a max-heap,
//! pops the best item from one side and evicts the worst from the other,
//! and removes the twin on the opposite side without searching.
//!
//! # Quick Start
//!
//! ```
//! use mempool_collections::{BoundedDualHeap, PriorityItem};
//!
//! struct Order {
//!     id: u32,
//!     bid: f64,
//! }
//!
//! impl PriorityItem for Order {
//!     fn priority(&self) -> f64 {
//!         self.bid
//!     }
//! }
//!
//! // Keep the best two orders
//! let mut book = BoundedDualHeap::new(2);
//! book.push(Order { id: 1, bid: 10.0 });
//! book.push(Order { id: 2, bid: 30.0 });
//! book.push(Order { id: 3, bid: 20.0 }); // evicts order 1
//!
//! assert_eq!(book.pop().id, 2);
//! assert_eq!(book.pop().id, 3);
//! assert!(book.is_empty());
//! ```
//!
//! # Data Structures
//!
//! | Structure | Use Case | Key Operations |
//! |-----------|----------|----------------|
//! | [`Heap`] | Priority queues, timers | O(log n) push/pop/remove-at-slot |
//! | [`BoundedDualHeap`] | Top-N retention | O(log n) push/pop/evict, O(1) len |

#![warn(missing_docs)]

pub mod bounded;
pub mod heap;
pub mod index;
pub mod storage;

pub use bounded::{BoundedDualHeap, Drain, PriorityItem};
pub use heap::{Heap, HeapEntry, HeapOrder, MaxFirst, MinFirst};
pub use index::Index;
pub use storage::Storage;
