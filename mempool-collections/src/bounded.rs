//! Capacity-bounded priority queue over a paired min-heap and max-heap.
//!
//! Each item is represented by two entries in one arena, one per heap, and
//! each entry records the arena id of its twin. The max-heap serves
//! extraction, the min-heap serves eviction, and whichever side an item
//! leaves from, its twin is removed from the other side through the twin's
//! recorded slot in O(log n) with no scan.
//!
//! ```text
//!   entries (slab)                         items (slab)
//!   id  prio  slot  twin  item             id
//!    0   2.0    0     1     0               0: tx_a (2.0)
//!    1   2.0    1     0     0               1: tx_b (5.0)
//!    2   5.0    1     3     1
//!    3   5.0    0     2     1
//!
//!   min heap: [0, 2]        max heap: [3, 1]
//! ```

use core::cmp::Ordering;

use slab::Slab;

use crate::heap::{Heap, HeapEntry, MaxFirst, MinFirst};
use crate::Index;

/// Anything that can be ranked by the queue.
///
/// `priority` must be deterministic: the queue reads it once on push and
/// never again. Higher values are kept longer and popped first.
pub trait PriorityItem {
    /// Returns the rank of this item.
    fn priority(&self) -> f64;
}

impl PriorityItem for f64 {
    #[inline]
    fn priority(&self) -> f64 {
        *self
    }
}

impl<T: PriorityItem + ?Sized> PriorityItem for &T {
    #[inline]
    fn priority(&self) -> f64 {
        (**self).priority()
    }
}

impl<T: PriorityItem + ?Sized> PriorityItem for Box<T> {
    #[inline]
    fn priority(&self) -> f64 {
        (**self).priority()
    }
}

/// One side of an item's representation.
///
/// Ordered by `f64::total_cmp`, so NaN priorities still give a total order
/// (positive NaN ranks above infinity).
#[derive(Debug)]
struct PairedEntry {
    priority: f64,
    /// Position in the owning heap's array.
    slot: usize,
    /// Arena id of the entry for the same item in the other heap.
    twin: usize,
    /// Arena id of the item both twins stand for.
    item: usize,
}

impl HeapEntry<usize> for PairedEntry {
    #[inline]
    fn heap_idx(&self) -> usize {
        self.slot
    }

    #[inline]
    fn set_heap_idx(&mut self, idx: usize) {
        self.slot = idx;
    }
}

impl Ord for PairedEntry {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.total_cmp(&other.priority)
    }
}

impl PartialOrd for PairedEntry {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PairedEntry {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PairedEntry {}

/// A priority queue that keeps at most `capacity` items, dropping the
/// lowest-priority one whenever a push goes over the bound.
///
/// Push, pop and eviction are all O(log n); `len` is O(1).
///
/// # Example
///
/// ```
/// use mempool_collections::BoundedDualHeap;
///
/// let mut queue: BoundedDualHeap<f64> = BoundedDualHeap::new(3);
///
/// queue.push(2.0);
/// queue.push(7.0);
/// queue.push(4.0);
///
/// // Over capacity: the lowest priority is evicted and handed back
/// assert_eq!(queue.push(9.0), Some(2.0));
/// assert_eq!(queue.len(), 3);
///
/// assert_eq!(queue.pop(), 9.0);
/// assert_eq!(queue.pop(), 7.0);
/// assert_eq!(queue.pop(), 4.0);
/// assert!(queue.is_empty());
/// ```
///
/// # Concurrency
///
/// The queue is `Send` when `T` is. Both `push` and `pop` mutate the two
/// heaps in dependent steps, so sharing one queue between threads needs a
/// single lock around the whole value.
#[derive(Debug)]
pub struct BoundedDualHeap<T> {
    items: Slab<T>,
    entries: Slab<PairedEntry>,
    min: Heap<usize, MinFirst>,
    max: Heap<usize, MaxFirst>,
    capacity: usize,
}

impl<T: PriorityItem> BoundedDualHeap<T> {
    /// Creates an empty queue holding at most `capacity` items.
    ///
    /// A capacity of zero is allowed: every push is immediately evicted.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Slab::new(),
            entries: Slab::new(),
            min: Heap::new(),
            max: Heap::new(),
            capacity,
        }
    }

    /// Returns the number of items held.
    #[inline]
    pub fn len(&self) -> usize {
        self.max.len()
    }

    /// Returns `true` if the queue holds no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max.is_empty()
    }

    /// Returns the bound fixed at construction.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Inserts an item.
    ///
    /// If the queue goes over capacity, the lowest-priority item (possibly
    /// the one just pushed) is evicted and returned. At most one item is
    /// evicted per push.
    pub fn push(&mut self, item: T) -> Option<T> {
        let priority = item.priority();
        let item = self.items.insert(item);

        let low = self.entries.insert(PairedEntry {
            priority,
            slot: usize::NONE,
            twin: usize::NONE,
            item,
        });
        let high = self.entries.insert(PairedEntry {
            priority,
            slot: usize::NONE,
            twin: low,
            item,
        });
        self.entries[low].twin = high;

        self.min.push(&mut self.entries, low);
        self.max.push(&mut self.entries, high);

        if self.len() > self.capacity {
            return Some(self.evict());
        }
        None
    }

    /// Removes and returns the highest-priority item.
    ///
    /// Among equal priorities, which one comes out first is unspecified.
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty. Check [`len`](Self::len) first or use
    /// [`try_pop`](Self::try_pop).
    pub fn pop(&mut self) -> T {
        self.try_pop().expect("pop from an empty queue")
    }

    /// Removes and returns the highest-priority item, or `None` if empty.
    pub fn try_pop(&mut self) -> Option<T> {
        let high = self.max.pop(&mut self.entries)?;
        let twin = self.entries[high].twin;

        let slot = self.entries[twin].slot;
        let removed = self.min.remove_at(&mut self.entries, slot);
        debug_assert_eq!(removed, twin, "twin slot out of sync");

        Some(self.release(high, twin))
    }

    /// Returns the highest-priority item without removing it.
    #[inline]
    pub fn peek_max(&self) -> Option<&T> {
        self.max.peek().map(|id| &self.items[self.entries[id].item])
    }

    /// Returns the item next in line for eviction without removing it.
    #[inline]
    pub fn peek_min(&self) -> Option<&T> {
        self.min.peek().map(|id| &self.items[self.entries[id].item])
    }

    /// Pops every item in descending priority order.
    ///
    /// Items not yet yielded when the iterator is dropped stay in the queue.
    #[inline]
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain { queue: self }
    }

    /// Drops every item.
    pub fn clear(&mut self) {
        self.min.clear(&mut self.entries);
        self.max.clear(&mut self.entries);
        self.entries.clear();
        self.items.clear();
    }

    fn evict(&mut self) -> T {
        let low = self
            .min
            .pop(&mut self.entries)
            .expect("over capacity implies non-empty");
        let twin = self.entries[low].twin;

        let slot = self.entries[twin].slot;
        let removed = self.max.remove_at(&mut self.entries, slot);
        debug_assert_eq!(removed, twin, "twin slot out of sync");

        self.release(low, twin)
    }

    /// Frees both entries of a pair, already out of their heaps, and hands
    /// back the item.
    fn release(&mut self, id: usize, twin: usize) -> T {
        let entry = self.entries.remove(id);
        self.entries.remove(twin);
        self.items.remove(entry.item)
    }
}

impl<T: PriorityItem> Extend<T> for BoundedDualHeap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

/// Iterator popping items in descending priority.
///
/// Created by [`BoundedDualHeap::drain`].
pub struct Drain<'a, T: PriorityItem> {
    queue: &'a mut BoundedDualHeap<T>,
}

impl<T: PriorityItem> Iterator for Drain<'_, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.queue.try_pop()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.queue.len();
        (len, Some(len))
    }
}

impl<T: PriorityItem> ExactSizeIterator for Drain<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Tx {
        fee: f64,
        id: u32,
    }

    impl Tx {
        fn new(fee: f64, id: u32) -> Self {
            Self { fee, id }
        }
    }

    impl PriorityItem for Tx {
        fn priority(&self) -> f64 {
            self.fee
        }
    }

    /// Checks the pairing invariants: equal lengths, symmetric twins that
    /// share an item, accurate slots and heap order on both sides.
    fn assert_consistent<T: PriorityItem>(queue: &BoundedDualHeap<T>) {
        let min: Vec<usize> = queue.min.iter().collect();
        let max: Vec<usize> = queue.max.iter().collect();

        assert_eq!(min.len(), max.len(), "heaps out of step");
        assert_eq!(queue.items.len(), min.len());
        assert_eq!(queue.entries.len(), 2 * min.len());

        for (pos, &id) in min.iter().enumerate() {
            let entry = &queue.entries[id];
            assert_eq!(entry.slot, pos, "stale min slot");

            let twin = &queue.entries[entry.twin];
            assert_eq!(twin.twin, id, "twins disagree");
            assert_eq!(twin.item, entry.item);
            assert_eq!(max.get(twin.slot), Some(&entry.twin), "stale max slot");

            if pos > 0 {
                assert!(queue.entries[min[(pos - 1) / 2]] <= *entry);
            }
        }

        for (pos, &id) in max.iter().enumerate() {
            assert_eq!(queue.entries[id].slot, pos);
            if pos > 0 {
                assert!(queue.entries[max[(pos - 1) / 2]] >= queue.entries[id]);
            }
        }
    }

    fn drain_fees(queue: &mut BoundedDualHeap<Tx>) -> Vec<f64> {
        let mut fees = Vec::new();
        while !queue.is_empty() {
            fees.push(queue.pop().fee);
            assert_consistent(queue);
        }
        fees
    }

    #[test]
    fn new_is_empty() {
        let queue: BoundedDualHeap<Tx> = BoundedDualHeap::new(100);
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.capacity(), 100);
        assert!(queue.peek_max().is_none());
        assert!(queue.peek_min().is_none());
    }

    #[test]
    fn priority_ordering_all_permutations() {
        let permutations = [
            [1.0, 2.0, 3.0],
            [1.0, 3.0, 2.0],
            [2.0, 1.0, 3.0],
            [2.0, 3.0, 1.0],
            [3.0, 1.0, 2.0],
            [3.0, 2.0, 1.0],
        ];

        for input in permutations {
            let mut queue = BoundedDualHeap::new(100);
            for (id, fee) in input.into_iter().enumerate() {
                queue.push(Tx::new(fee, id as u32));
                assert_consistent(&queue);
            }

            assert_eq!(drain_fees(&mut queue), vec![3.0, 2.0, 1.0], "input {input:?}");
        }
    }

    #[test]
    fn equal_priorities_follow_higher_ones() {
        let mut queue = BoundedDualHeap::new(100);
        queue.push(Tx::new(1.0, 1));
        queue.push(Tx::new(1.0, 2));
        queue.push(Tx::new(3.0, 3));

        let first = queue.pop();
        assert_eq!(first, Tx::new(3.0, 3));

        let mut rest = vec![queue.pop().id, queue.pop().id];
        rest.sort_unstable();
        assert_eq!(rest, vec![1, 2]);
    }

    #[test]
    fn size_tracks_pushes_up_to_capacity() {
        let mut queue = BoundedDualHeap::new(4);

        for i in 0..4 {
            queue.push(Tx::new(i as f64, i));
            assert_eq!(queue.len(), i as usize + 1);
        }
        for i in 4..20 {
            queue.push(Tx::new(i as f64, i));
            assert_eq!(queue.len(), 4);
        }
    }

    #[test]
    fn over_capacity_discards_lowest() {
        let mut queue = BoundedDualHeap::new(10);
        for i in 0..15 {
            queue.push(Tx::new(i as f64, i));
            assert_consistent(&queue);
        }

        let expected: Vec<f64> = (5..15).rev().map(|i| i as f64).collect();
        assert_eq!(drain_fees(&mut queue), expected);
    }

    #[test]
    fn push_returns_evicted_item() {
        let mut queue = BoundedDualHeap::new(2);

        assert_eq!(queue.push(Tx::new(5.0, 1)), None);
        assert_eq!(queue.push(Tx::new(3.0, 2)), None);
        assert_eq!(queue.push(Tx::new(4.0, 3)), Some(Tx::new(3.0, 2)));

        // New item lower than everything held: it is the one evicted
        assert_eq!(queue.push(Tx::new(1.0, 4)), Some(Tx::new(1.0, 4)));
        assert_eq!(queue.peek_min(), Some(&Tx::new(4.0, 3)));
        assert_eq!(queue.peek_max(), Some(&Tx::new(5.0, 1)));
    }

    #[test]
    fn zero_capacity_stays_empty() {
        let mut queue = BoundedDualHeap::new(0);

        for i in 0..5 {
            assert_eq!(queue.push(Tx::new(i as f64, i)), Some(Tx::new(i as f64, i)));
            assert!(queue.is_empty());
            assert_consistent(&queue);
        }
    }

    #[test]
    fn drain_to_empty() {
        let mut queue = BoundedDualHeap::new(100);
        queue.push(Tx::new(1.0, 1));
        queue.push(Tx::new(2.0, 2));
        queue.push(Tx::new(3.0, 3));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop().fee, 3.0);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop().fee, 2.0);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop().fee, 1.0);
        assert_eq!(queue.len(), 0);

        assert!(queue.try_pop().is_none());
        assert_eq!(queue.len(), 0);
    }

    #[test]
    #[should_panic(expected = "pop from an empty queue")]
    fn pop_empty_panics() {
        let mut queue: BoundedDualHeap<Tx> = BoundedDualHeap::new(100);
        queue.push(Tx::new(1.0, 1));
        queue.pop();
        queue.pop();
    }

    #[test]
    fn drain_iterator() {
        let mut queue = BoundedDualHeap::new(100);
        queue.extend([4.0, 9.0, 1.0, 6.0]);

        let drain = queue.drain();
        assert_eq!(drain.len(), 4);
        assert_eq!(drain.collect::<Vec<_>>(), vec![9.0, 6.0, 4.0, 1.0]);
        assert!(queue.is_empty());
    }

    #[test]
    fn partial_drain_keeps_rest() {
        let mut queue = BoundedDualHeap::new(100);
        queue.extend([4.0, 9.0, 1.0, 6.0]);

        let top: Vec<f64> = queue.drain().take(2).collect();
        assert_eq!(top, vec![9.0, 6.0]);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek_max(), Some(&4.0));
    }

    #[test]
    fn clear() {
        let mut queue = BoundedDualHeap::new(100);
        queue.extend([1.0, 2.0, 3.0]);

        queue.clear();

        assert!(queue.is_empty());
        assert_consistent(&queue);

        queue.push(5.0);
        assert_eq!(queue.pop(), 5.0);
    }

    #[test]
    fn borrowed_items() {
        let fees = [3.0, 8.0, 5.0];
        let mut queue: BoundedDualHeap<&f64> = BoundedDualHeap::new(2);
        queue.extend(fees.iter());

        assert_eq!(queue.pop(), &8.0);
        assert_eq!(queue.pop(), &5.0);
    }

    #[test]
    fn nan_ranks_above_everything() {
        let mut queue = BoundedDualHeap::new(2);
        queue.push(f64::INFINITY);
        queue.push(f64::NAN);
        queue.push(1.0);

        assert!(queue.pop().is_nan());
        assert_eq!(queue.pop(), f64::INFINITY);
    }

    #[test]
    fn is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<BoundedDualHeap<Tx>>();
    }

    #[test]
    fn stress_against_sorted_model() {
        const CAPACITY: usize = 64;

        let mut queue = BoundedDualHeap::new(CAPACITY);
        let mut model: Vec<u32> = Vec::new();

        for i in 0..1000u32 {
            let fee = (i * 37 + 11) % 1000; // Deterministic scramble, all distinct
            let evicted = queue.push(Tx::new(fee as f64, i));

            model.push(fee);
            model.sort_unstable();
            let expected_evicted = (model.len() > CAPACITY).then(|| model.remove(0));
            assert_eq!(evicted.map(|tx| tx.fee as u32), expected_evicted);

            if i % 3 == 2 {
                let popped = queue.pop();
                assert_eq!(Some(popped.fee as u32), model.pop());
            }

            assert_consistent(&queue);
            assert_eq!(queue.len(), model.len());
        }

        let drained: Vec<u32> = queue.drain().map(|tx| tx.fee as u32).collect();
        model.reverse();
        assert_eq!(drained, model);
    }
}
