//! Fixed-capacity ring buffer for trail samples
//!
//! Overwrite-oldest insertion; "last N" reads are well-defined for any
//! N <= len via modular indexing from the write cursor.

/// A fixed-capacity circular buffer.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    items: Vec<T>,
    /// Next write slot
    head: usize,
    len: usize,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: Vec::with_capacity(capacity),
            head: 0,
            len: 0,
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a sample, overwriting the oldest when full.
    pub fn push(&mut self, value: T) {
        if self.len < self.capacity {
            self.items.push(value);
            self.len += 1;
        } else {
            self.items[self.head] = value;
        }
        self.head = (self.head + 1) % self.capacity;
    }

    /// Iterate the min(n, len) most-recent samples, oldest to newest.
    pub fn iter_last(&self, n: usize) -> impl Iterator<Item = &T> {
        let n = n.min(self.len);
        let start = (self.head + self.capacity - n) % self.capacity;
        (0..n).map(move |i| &self.items[(start + i) % self.capacity])
    }

    /// Mutable iteration over every stored sample (order unspecified).
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.head = 0;
        self.len = 0;
    }
}
