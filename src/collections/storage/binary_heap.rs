/*!
 * Predicate Binary Heap
 *
 * Array-backed binary heap ordered by a caller-supplied predicate
 * `is_item_ordered(a, b)`: true when `a` must sit closer to the root than `b`.
 *
 * Ties (neither item ordered before the other) fall back to insertion order,
 * so equal-priority items come out first-in first-out.
 */

use std::sync::Arc;

/// Ordering predicate shared by heap stores
pub type OrderFn<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

struct Entry<T> {
    seq: u64,
    value: T,
}

pub(crate) struct PredicateHeap<T> {
    entries: Vec<Entry<T>>,
    next_seq: u64,
    ordered: OrderFn<T>,
}

impl<T> PredicateHeap<T> {
    pub fn new(ordered: OrderFn<T>) -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
            ordered,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether entry `a` belongs above entry `b`
    #[inline]
    fn before(&self, a: usize, b: usize) -> bool {
        let (ea, eb) = (&self.entries[a], &self.entries[b]);
        if (self.ordered)(&ea.value, &eb.value) {
            return true;
        }
        !(self.ordered)(&eb.value, &ea.value) && ea.seq < eb.seq
    }

    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.before(index, parent) {
                break;
            }
            self.entries.swap(index, parent);
            index = parent;
        }
        index
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut best = index;

            if left < len && self.before(left, best) {
                best = left;
            }
            if right < len && self.before(right, best) {
                best = right;
            }
            if best == index {
                break;
            }
            self.entries.swap(index, best);
            index = best;
        }
    }

    /// Restore the heap property around a modified slot
    fn fix(&mut self, index: usize) {
        if self.sift_up(index) == index {
            self.sift_down(index);
        }
    }

    pub fn push(&mut self, value: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { seq, value });
        let last = self.entries.len() - 1;
        self.sift_up(last);
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.entries.is_empty() {
            return None;
        }
        let entry = self.entries.swap_remove(0);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some(entry.value)
    }

    pub fn peek(&self) -> Option<&T> {
        self.entries.first().map(|e| &e.value)
    }

    /// Replace the first value matching `pred`, keeping its insertion rank
    pub fn replace_first<P, M>(&mut self, mut pred: P, mapper: M) -> bool
    where
        P: FnMut(&T) -> bool,
        M: FnOnce(&T) -> T,
    {
        let Some(index) = self.entries.iter().position(|e| pred(&e.value)) else {
            return false;
        };
        let replacement = mapper(&self.entries[index].value);
        self.entries[index].value = replacement;
        self.fix(index);
        true
    }

    pub fn remove_first<P>(&mut self, mut pred: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        let index = self.entries.iter().position(|e| pred(&e.value))?;
        let entry = self.entries.swap_remove(index);
        if index < self.entries.len() {
            self.fix(index);
        }
        Some(entry.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
