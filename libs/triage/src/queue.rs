/// A thread safe priority queue keyed by element identity.
///
/// [`std::cmp::Ordering::Greater`] on `P` corresponds to a more urgent entry: [`pop`](Self::pop)
/// always hands out the entry with the greatest priority currently queued.
///
/// None of the operations fail. An empty queue is signalled by `None`, and re-prioritizing an
/// element that is not queued is a no-op.
pub trait PriorityQueue<E, P>: Send + Sync + 'static {
    /// Queues `element` with `priority`.
    ///
    /// Adding an element that is already queued does not replace the existing entry, both entries
    /// coexist until they are popped or updated. Use [`upsert`](Self::upsert) to replace instead.
    fn add(&self, element: E, priority: P);

    /// Removes the most urgent entry and returns it together with its priority.
    fn pop_entry(&self) -> Option<Entry<E, P>>;

    /// Moves one queued entry of `element` to `priority`.
    ///
    /// Does nothing if `element` is not queued. If it was added several times, only one of its
    /// entries is moved and callers must not rely on which one.
    fn update(&self, element: E, priority: P);

    /// Moves one queued entry of `element` to `priority`, or queues it if there is none.
    fn upsert(&self, element: E, priority: P);

    /// Number of queued entries.
    fn len(&self) -> usize;

    /// Removes the most urgent element.
    fn pop(&self) -> Option<E> {
        self.pop_entry().map(Entry::into_element)
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pops up to `n` elements, most urgent first.
    fn drain(&self, n: usize) -> Vec<E> {
        let mut drained = Vec::with_capacity(n);
        for _ in 0..n {
            let Some(element) = self.pop() else {
                break;
            };
            drained.push(element);
        }
        drained
    }
}

/// One queued unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<E, P> {
    pub element: E,
    pub priority: P,
}

impl<E, P> Entry<E, P> {
    pub fn new(element: E, priority: P) -> Self {
        Self { element, priority }
    }

    pub fn into_element(self) -> E {
        self.element
    }
}
