use std::sync::{Mutex, MutexGuard, PoisonError};

use triage::{Entry, PriorityQueue};

use crate::list::OrderedList;

/// Ordered sequence behind a single mutex. Every operation holds the lock for its full duration,
/// which makes the queue linearizable at the cost of serializing all callers.
#[derive(Debug)]
pub struct LockedQueue<E, P> {
    storage: Mutex<OrderedList<E, P>>,
}

impl<E, P> Default for LockedQueue<E, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, P> LockedQueue<E, P> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Mutex::new(OrderedList::with_capacity(capacity)),
        }
    }

    /// The sequence is only relinked after all priority comparisons succeeded, so a panic while
    /// holding the lock cannot leave it half linked.
    fn storage(&self) -> MutexGuard<'_, OrderedList<E, P>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E, P> PriorityQueue<E, P> for LockedQueue<E, P>
where
    E: PartialEq + Send + 'static,
    P: Ord + Send + 'static,
{
    /// O(1) when `priority` is a new maximum or minimum, a linear walk otherwise.
    fn add(&self, element: E, priority: P) {
        self.storage().insert(Entry::new(element, priority));
    }

    fn pop_entry(&self) -> Option<Entry<E, P>> {
        self.storage().pop_front()
    }

    fn update(&self, element: E, priority: P) {
        let mut storage = self.storage();
        if storage.remove(&element).is_some() {
            storage.insert(Entry::new(element, priority));
        }
    }

    fn upsert(&self, element: E, priority: P) {
        let mut storage = self.storage();
        storage.remove(&element);
        storage.insert(Entry::new(element, priority));
    }

    fn len(&self) -> usize {
        self.storage().len()
    }

    /// Drains under one lock acquisition, so the batch is a consistent prefix of the queue.
    fn drain(&self, n: usize) -> Vec<E> {
        let mut storage = self.storage();

        let mut items = Vec::with_capacity(n.min(storage.len()));
        for _ in 0..n {
            let Some(entry) = storage.pop_front() else {
                break;
            };
            items.push(entry.element);
        }

        items
    }
}
