//! Binary heap over arena storage with O(log n) removal from any slot.
//!
//! Entries embed their own heap position. Every move inside the backing
//! array goes through a swap that rewrites both moved entries' positions in
//! the same step, so an entry's recorded slot is never stale.

use core::marker::PhantomData;

use crate::{Index, Storage};

const VACANT: &str = "heap references a vacant slot";

/// Trait for types that can participate in a heap.
///
/// Implementors embed their heap position and define ordering.
///
/// # Example
///
/// ```
/// use mempool_collections::{HeapEntry, Index};
/// use std::cmp::Ordering;
///
/// struct Bid {
///     price: u64,
///     slot: usize,
/// }
///
/// impl HeapEntry<usize> for Bid {
///     fn heap_idx(&self) -> usize { self.slot }
///     fn set_heap_idx(&mut self, idx: usize) { self.slot = idx; }
/// }
///
/// impl Ord for Bid {
///     fn cmp(&self, other: &Self) -> Ordering {
///         self.price.cmp(&other.price)
///     }
/// }
///
/// impl PartialOrd for Bid {
///     fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
///         Some(self.cmp(other))
///     }
/// }
///
/// impl PartialEq for Bid {
///     fn eq(&self, other: &Self) -> bool {
///         self.price == other.price
///     }
/// }
///
/// impl Eq for Bid {}
/// ```
pub trait HeapEntry<Idx: Index>: Ord {
    /// Returns this entry's position in the heap, or `Idx::NONE` if not in heap.
    fn heap_idx(&self) -> Idx;

    /// Sets this entry's position in the heap.
    fn set_heap_idx(&mut self, idx: Idx);

    /// Returns `true` if this entry is currently in a heap.
    #[inline]
    fn in_heap(&self) -> bool {
        self.heap_idx().is_some()
    }
}

/// Ordering predicate deciding which element sits closer to the root.
pub trait HeapOrder {
    /// Returns `true` if `a` must sit above `b`.
    ///
    /// Must be strict: equal elements never precede each other.
    fn precedes<T: Ord>(a: &T, b: &T) -> bool;
}

/// Root is the smallest element.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinFirst;

impl HeapOrder for MinFirst {
    #[inline]
    fn precedes<T: Ord>(a: &T, b: &T) -> bool {
        a < b
    }
}

/// Root is the largest element.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxFirst;

impl HeapOrder for MaxFirst {
    #[inline]
    fn precedes<T: Ord>(a: &T, b: &T) -> bool {
        a > b
    }
}

/// A binary heap over arena storage.
///
/// Elements live in external storage and are referenced by id. The order
/// parameter picks whether the root is the minimum ([`MinFirst`]) or the
/// maximum ([`MaxFirst`]).
///
/// # Example
///
/// ```
/// use mempool_collections::{Heap, HeapEntry, Index, MaxFirst, Storage};
/// use slab::Slab;
/// use std::cmp::Ordering;
///
/// #[derive(Debug)]
/// struct Task {
///     priority: u32,
///     name: &'static str,
///     slot: usize,
/// }
///
/// impl Task {
///     fn new(priority: u32, name: &'static str) -> Self {
///         Self { priority, name, slot: usize::NONE }
///     }
/// }
///
/// impl HeapEntry<usize> for Task {
///     fn heap_idx(&self) -> usize { self.slot }
///     fn set_heap_idx(&mut self, idx: usize) { self.slot = idx; }
/// }
///
/// impl Ord for Task {
///     fn cmp(&self, other: &Self) -> Ordering {
///         self.priority.cmp(&other.priority)
///     }
/// }
/// impl PartialOrd for Task {
///     fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
///         Some(self.cmp(other))
///     }
/// }
/// impl PartialEq for Task {
///     fn eq(&self, other: &Self) -> bool {
///         self.priority == other.priority
///     }
/// }
/// impl Eq for Task {}
///
/// let mut storage: Slab<Task> = Slab::with_capacity(16);
/// let mut heap: Heap<usize, MaxFirst> = Heap::with_capacity(16);
///
/// let a = Storage::insert(&mut storage, Task::new(1, "low"));
/// let b = Storage::insert(&mut storage, Task::new(10, "high"));
/// let c = Storage::insert(&mut storage, Task::new(5, "medium"));
///
/// heap.push(&mut storage, a);
/// heap.push(&mut storage, b);
/// heap.push(&mut storage, c);
///
/// // Pops largest first
/// let idx = heap.pop(&mut storage).unwrap();
/// assert_eq!(storage[idx].name, "high");
/// let idx = heap.pop(&mut storage).unwrap();
/// assert_eq!(storage[idx].name, "medium");
/// let idx = heap.pop(&mut storage).unwrap();
/// assert_eq!(storage[idx].name, "low");
/// ```
#[derive(Debug, Clone)]
pub struct Heap<Idx: Index, O: HeapOrder = MinFirst> {
    /// Heap-ordered storage ids.
    heap: Vec<Idx>,
    _order: PhantomData<O>,
}

impl<Idx: Index, O: HeapOrder> Default for Heap<Idx, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Idx: Index, O: HeapOrder> Heap<Idx, O> {
    /// Creates an empty heap.
    #[inline]
    pub const fn new() -> Self {
        Self {
            heap: Vec::new(),
            _order: PhantomData,
        }
    }

    /// Creates a heap with pre-allocated capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            _order: PhantomData,
        }
    }

    /// Returns the number of elements in the heap.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if the heap is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the id at the root without removing it.
    ///
    /// Returns `None` if the heap is empty.
    #[inline]
    pub fn peek(&self) -> Option<Idx> {
        self.heap.first().copied()
    }

    /// Iterates ids in array order (slot 0 first).
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Idx> + '_ {
        self.heap.iter().copied()
    }

    /// Pushes an element onto the heap.
    ///
    /// The element must already exist in storage.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not valid in storage.
    pub fn push<T, S>(&mut self, storage: &mut S, idx: Idx)
    where
        T: HeapEntry<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let entry = storage.get_mut(idx).expect("invalid index");
        debug_assert!(!entry.in_heap(), "element already in heap");

        let pos = self.heap.len();
        entry.set_heap_idx(Idx::from_usize(pos));
        self.heap.push(idx);

        self.sift_up(storage, pos);
    }

    /// Removes and returns the id at the root.
    ///
    /// Returns `None` if the heap is empty.
    pub fn pop<T, S>(&mut self, storage: &mut S) -> Option<Idx>
    where
        T: HeapEntry<Idx>,
        S: Storage<T, Index = Idx>,
    {
        if self.heap.is_empty() {
            return None;
        }

        Some(self.remove_at(storage, 0))
    }

    /// Removes the element at array position `pos` and returns its id.
    ///
    /// The last element moves into the hole and is sifted whichever way
    /// restores order: up if it now precedes its parent, otherwise down.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds.
    pub fn remove_at<T, S>(&mut self, storage: &mut S, pos: usize) -> Idx
    where
        T: HeapEntry<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let len = self.heap.len();
        assert!(pos < len, "slot {pos} out of bounds for heap of length {len}");

        let last = len - 1;
        if pos != last {
            self.swap(storage, pos, last);
        }

        let idx = self.heap.pop().expect("heap is non-empty");
        storage.get_mut(idx).expect(VACANT).set_heap_idx(Idx::NONE);

        if pos < self.heap.len() && !self.sift_up(storage, pos) {
            self.sift_down(storage, pos);
        }

        idx
    }

    /// Removes an arbitrary element from the heap by id.
    ///
    /// Returns `true` if the element was in the heap and removed.
    ///
    /// This is O(log n) because entries track their own heap position.
    pub fn remove<T, S>(&mut self, storage: &mut S, idx: Idx) -> bool
    where
        T: HeapEntry<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let heap_idx = match storage.get(idx) {
            Some(entry) => entry.heap_idx(),
            None => return false,
        };

        if heap_idx.is_none() {
            return false;
        }

        let pos = heap_idx.as_usize();
        debug_assert!(self.heap.get(pos) == Some(&idx), "entry belongs to another heap");

        self.remove_at(storage, pos);
        true
    }

    /// Clears the heap, marking all entries as not in heap.
    pub fn clear<T, S>(&mut self, storage: &mut S)
    where
        T: HeapEntry<Idx>,
        S: Storage<T, Index = Idx>,
    {
        for &idx in &self.heap {
            if let Some(entry) = storage.get_mut(idx) {
                entry.set_heap_idx(Idx::NONE);
            }
        }
        self.heap.clear();
    }

    /// Exchanges two array slots and records the new positions in both entries.
    #[inline]
    fn swap<T, S>(&mut self, storage: &mut S, i: usize, j: usize)
    where
        T: HeapEntry<Idx>,
        S: Storage<T, Index = Idx>,
    {
        self.heap.swap(i, j);
        for pos in [i, j] {
            let idx = self.heap[pos];
            storage
                .get_mut(idx)
                .expect(VACANT)
                .set_heap_idx(Idx::from_usize(pos));
        }
    }

    #[inline]
    fn precedes<T, S>(&self, storage: &S, i: usize, j: usize) -> bool
    where
        T: HeapEntry<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let a = storage.get(self.heap[i]).expect(VACANT);
        let b = storage.get(self.heap[j]).expect(VACANT);
        O::precedes(a, b)
    }

    /// Moves the element at `pos` towards the root. Returns `true` if it moved.
    fn sift_up<T, S>(&mut self, storage: &mut S, pos: usize) -> bool
    where
        T: HeapEntry<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let mut hole = pos;

        while hole > 0 {
            let parent = (hole - 1) / 2;
            if !self.precedes(storage, hole, parent) {
                break;
            }
            self.swap(storage, hole, parent);
            hole = parent;
        }

        hole != pos
    }

    /// Moves the element at `pos` towards the leaves.
    fn sift_down<T, S>(&mut self, storage: &mut S, pos: usize)
    where
        T: HeapEntry<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let len = self.heap.len();
        let mut hole = pos;

        loop {
            let left = 2 * hole + 1;
            if left >= len {
                break;
            }

            let right = left + 1;
            let child = if right < len && self.precedes(storage, right, left) {
                right
            } else {
                left
            };

            if !self.precedes(storage, child, hole) {
                break;
            }
            self.swap(storage, hole, child);
            hole = child;
        }
    }
}
