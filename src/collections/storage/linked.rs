/*!
 * Linked Sequence
 *
 * Doubly-linked list over an index arena.
 *
 * # Design: Arena Slots Over Boxed Nodes
 *
 * Nodes live in a `Vec` and link to each other by slot index; vacated slots
 * go on a free list and are reused. Insertion and removal next to a known
 * node are O(1); locating a position walks from whichever end is nearer.
 */

use crate::core::limits::LIST_INITIAL_RESERVE;

struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Arena-backed doubly-linked list
pub(crate) struct LinkedSeq<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> LinkedSeq<T> {
    pub fn new() -> Self {
        Self::with_reserve(LIST_INITIAL_RESERVE)
    }

    pub fn with_reserve(reserve: usize) -> Self {
        Self {
            slots: Vec::with_capacity(reserve),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn node(&self, key: usize) -> Option<&Node<T>> {
        self.slots.get(key).and_then(Option::as_ref)
    }

    #[inline]
    fn node_mut(&mut self, key: usize) -> Option<&mut Node<T>> {
        self.slots.get_mut(key).and_then(Option::as_mut)
    }

    /// Slot key of the node at `index`, walking from the nearer end
    fn key_at(&self, index: usize) -> Option<usize> {
        if index >= self.len {
            return None;
        }

        if index <= self.len / 2 {
            let mut cursor = self.head;
            for _ in 0..index {
                cursor = cursor.and_then(|k| self.node(k)).and_then(|n| n.next);
            }
            cursor
        } else {
            let mut cursor = self.tail;
            for _ in 0..(self.len - 1 - index) {
                cursor = cursor.and_then(|k| self.node(k)).and_then(|n| n.prev);
            }
            cursor
        }
    }

    fn alloc(&mut self, node: Node<T>) -> usize {
        match self.free.pop() {
            Some(key) => {
                self.slots[key] = Some(node);
                key
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    /// Insert before the node `before`, or at the back when `None`
    fn insert_before(&mut self, before: Option<usize>, value: T) -> usize {
        let prev = match before {
            Some(next) => self.node(next).and_then(|n| n.prev),
            None => self.tail,
        };

        let key = self.alloc(Node {
            value,
            prev,
            next: before,
        });

        match prev {
            Some(p) => {
                if let Some(node) = self.node_mut(p) {
                    node.next = Some(key);
                }
            }
            None => self.head = Some(key),
        }
        match before {
            Some(n) => {
                if let Some(node) = self.node_mut(n) {
                    node.prev = Some(key);
                }
            }
            None => self.tail = Some(key),
        }

        self.len += 1;
        key
    }

    fn unlink(&mut self, key: usize) -> Option<T> {
        let node = self.slots.get_mut(key)?.take()?;

        match node.prev {
            Some(p) => {
                if let Some(prev) = self.node_mut(p) {
                    prev.next = node.next;
                }
            }
            None => self.head = node.next,
        }
        match node.next {
            Some(n) => {
                if let Some(next) = self.node_mut(n) {
                    next.prev = node.prev;
                }
            }
            None => self.tail = node.prev,
        }

        self.free.push(key);
        self.len -= 1;
        Some(node.value)
    }

    pub fn push_back(&mut self, value: T) {
        self.insert_before(None, value);
    }

    pub fn push_front(&mut self, value: T) {
        let head = self.head;
        self.insert_before(head, value);
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.unlink(tail)
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.head?;
        self.unlink(head)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.key_at(index)
            .and_then(|k| self.node(k))
            .map(|n| &n.value)
    }

    /// Remove `delete` nodes starting at `start`, then insert `items` there
    ///
    /// Callers resolve and clamp the range; `start <= len` and
    /// `start + delete <= len` are expected.
    pub fn splice_at(&mut self, start: usize, delete: usize, items: Vec<T>) -> Vec<T> {
        let mut cursor = self.key_at(start);
        let mut removed = Vec::with_capacity(delete);

        for _ in 0..delete {
            let Some(key) = cursor else { break };
            cursor = self.node(key).and_then(|n| n.next);
            if let Some(value) = self.unlink(key) {
                removed.push(value);
            }
        }

        for item in items {
            self.insert_before(cursor, item);
        }

        removed
    }

    /// Remove nodes matching `pred`, stopping after the first when `first_only`
    pub fn extract_if<F>(&mut self, mut pred: F, first_only: bool) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = Vec::new();
        let mut cursor = self.head;

        while let Some(key) = cursor {
            let Some(node) = self.node(key) else { break };
            cursor = node.next;

            if pred(&node.value) {
                if let Some(value) = self.unlink(key) {
                    removed.push(value);
                }
                if first_only {
                    break;
                }
            }
        }

        removed
    }

    /// Replace values matching `pred` in place; returns how many changed
    pub fn replace_if<P, M>(&mut self, mut pred: P, mut mapper: M, first_only: bool) -> usize
    where
        P: FnMut(&T) -> bool,
        M: FnMut(&T) -> T,
    {
        let mut replaced = 0;
        let mut cursor = self.head;

        while let Some(key) = cursor {
            let Some(node) = self.node_mut(key) else { break };
            cursor = node.next;

            if pred(&node.value) {
                node.value = mapper(&node.value);
                replaced += 1;
                if first_only {
                    break;
                }
            }
        }

        replaced
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            seq: self,
            cursor: self.head,
            remaining: self.len,
        }
    }
}

impl<T> Default for LinkedSeq<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for LinkedSeq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut seq = Self::new();
        for item in iter {
            seq.push_back(item);
        }
        seq
    }
}

/// Front-to-back iterator
pub(crate) struct Iter<'a, T> {
    seq: &'a LinkedSeq<T>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.seq.node(self.cursor?)?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
