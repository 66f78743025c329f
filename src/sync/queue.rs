//! Pending-input priority queue
//!
//! A min-queue ordered by sequence number, backed by a sorted vector.
//! Out-of-order network arrivals go in here and come out lowest-seq first;
//! the session re-enqueues an element when it is still ahead of the next
//! expected sequence number.

/// Min-priority queue keyed by an explicit priority value
#[derive(Debug, Clone, Default)]
pub struct PriorityQueue<T> {
    items: Vec<(u64, T)>,
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        PriorityQueue { items: Vec::new() }
    }

    /// Insert an element with the given priority. Equal priorities keep
    /// arrival order.
    pub fn enqueue(&mut self, priority: u64, element: T) {
        let pos = self.items.partition_point(|(p, _)| *p <= priority);
        self.items.insert(pos, (priority, element));
    }

    /// Remove and return the lowest-priority element
    pub fn dequeue(&mut self) -> Option<(u64, T)> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0))
        }
    }

    pub fn front(&self) -> Option<&T> {
        self.items.first().map(|(_, e)| e)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
