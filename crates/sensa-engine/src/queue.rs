//! Bounded priority queue
//!
//! Backing store for attention: items are ranked by priority, and when the
//! queue is full a new item must beat the current minimum to get in.

/// A prioritized entry.
#[derive(Clone, Debug)]
pub struct Item<T> {
    pub priority: f64,
    pub value: T,
}

/// Outcome of a push attempt.
pub struct PushFeedback<T> {
    /// Whether the new item was admitted.
    pub added: bool,
    /// The item displaced to make room, if any.
    pub evicted: Option<Item<T>>,
}

/// Capacity-bounded queue, kept sorted ascending by priority so the
/// eviction candidate is always at index 0.
pub struct PriorityQueue<T> {
    items: Vec<Item<T>>,
    capacity: usize,
}

impl<T> PriorityQueue<T> {
    pub fn new(capacity: usize) -> Self {
        PriorityQueue {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, priority: f64, value: T) -> PushFeedback<T> {
        let mut evicted = None;
        if self.items.len() == self.capacity {
            match self.items.first() {
                Some(min) if priority > min.priority => {
                    evicted = Some(self.items.remove(0));
                }
                _ => {
                    return PushFeedback {
                        added: false,
                        evicted: None,
                    };
                }
            }
        }
        let at = self
            .items
            .partition_point(|item| item.priority <= priority);
        self.items.insert(at, Item { priority, value });
        PushFeedback {
            added: true,
            evicted,
        }
    }

    /// Lowest-priority item.
    pub fn peek_min(&self) -> Option<&Item<T>> {
        self.items.first()
    }

    /// Remove and return the lowest-priority item.
    pub fn pop_min(&mut self) -> Option<T> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0).value)
        }
    }

    /// Index of the first item whose value satisfies the predicate.
    pub fn position(&self, mut pred: impl FnMut(&T) -> bool) -> Option<usize> {
        self.items.iter().position(|item| pred(&item.value))
    }

    pub fn get(&self, index: usize) -> Option<&Item<T>> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Item<T>> {
        self.items.get_mut(index)
    }

    /// Raise or lower an item's priority, restoring sort order. Returns the
    /// item's new index.
    pub fn reprioritize(&mut self, index: usize, priority: f64) -> usize {
        let mut item = self.items.remove(index);
        item.priority = priority;
        let at = self
            .items
            .partition_point(|other| other.priority <= priority);
        self.items.insert(at, item);
        at
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item<T>> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Item<T>> {
        self.items.iter_mut()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_ascending_order() {
        let mut q = PriorityQueue::new(4);
        q.push(0.5, "b");
        q.push(0.9, "c");
        q.push(0.1, "a");
        let order: Vec<&str> = q.iter().map(|i| i.value).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn full_queue_evicts_minimum() {
        let mut q = PriorityQueue::new(2);
        q.push(0.1, "low");
        q.push(0.5, "mid");
        let fb = q.push(0.9, "high");
        assert!(fb.added);
        assert_eq!(fb.evicted.map(|i| i.value), Some("low"));
        assert_eq!(q.len(), 2);
        assert_eq!(q.peek_min().map(|i| i.value), Some("mid"));
    }

    #[test]
    fn full_queue_rejects_at_or_below_minimum() {
        let mut q = PriorityQueue::new(2);
        q.push(0.5, "a");
        q.push(0.9, "b");
        let fb = q.push(0.5, "c");
        assert!(!fb.added);
        assert!(fb.evicted.is_none());
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn reprioritize_moves_item() {
        let mut q = PriorityQueue::new(4);
        q.push(0.1, "a");
        q.push(0.5, "b");
        let idx = q.position(|v| *v == "a").unwrap();
        q.reprioritize(idx, 0.9);
        assert_eq!(q.peek_min().map(|i| i.value), Some("b"));
    }
}
