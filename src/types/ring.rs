//! Fixed-capacity ring buffer
//!
//! Storage is allocated once at construction; pushing into a full buffer
//! overwrites the oldest slot in place. Used for the per-axis speed window
//! and the motion history, both of which are touched every cycle.

#[derive(Clone, Debug)]
pub struct RingBuffer<T> {
    slots: Vec<T>,
    capacity: usize,
    /// Index of the oldest element once the buffer has wrapped
    head: usize,
}

impl<T> RingBuffer<T> {
    /// Create an empty buffer. A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        RingBuffer {
            slots: Vec::with_capacity(capacity),
            capacity,
            head: 0,
        }
    }

    /// Append a value, evicting and returning the oldest one when full.
    pub fn push(&mut self, value: T) -> Option<T> {
        if !self.is_full() {
            self.slots.push(value);
            return None;
        }

        let evicted = std::mem::replace(&mut self.slots[self.head], value);
        self.head = (self.head + 1) % self.capacity;
        Some(evicted)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let (newer, older) = self.slots.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    /// Drop all elements; the allocation is kept.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = 0;
    }
}

impl RingBuffer<f64> {
    /// Arithmetic mean of the stored values, 0 when empty
    pub fn mean(&self) -> f64 {
        if self.slots.is_empty() {
            return 0.0;
        }
        self.slots.iter().sum::<f64>() / self.slots.len() as f64
    }
}
