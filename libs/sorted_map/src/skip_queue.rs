use std::{
    fmt,
    hash::Hash,
    sync::atomic::{AtomicU64, Ordering},
};

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;
use tracing::trace;
use triage::{Entry, PriorityQueue};

use crate::key::RankKey;

/// Priority queue on top of a lock-free skip list.
///
/// Adders and poppers do not block each other: `pop` atomically takes the front of the skip list,
/// so two concurrent poppers never receive the same entry. An index from element to its queued
/// keys lets `update` find the entry without walking the skip list. The index shard of an element
/// is locked while that element's keys are inserted or removed.
///
/// # Consistency
/// Every single `add` and `pop` is atomic, `update` and `upsert` are not: they remove the old
/// entry before inserting the new one. A concurrent `pop` or `len` can observe the element as
/// absent in between. It is never observed twice.
pub struct SkipQueue<E, P> {
    ranks: SkipMap<RankKey<P>, E>,
    /// Keys of every queued entry, oldest first, per element.
    index: DashMap<E, Vec<RankKey<P>>>,
    tickets: AtomicU64,
}

impl<E, P> SkipQueue<E, P>
where
    E: Eq + Hash + Clone + Send + Sync + 'static,
    P: Ord + Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// `capacity` pre-sizes the element index, the skip list grows node by node.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ranks: SkipMap::new(),
            index: DashMap::with_capacity(capacity),
            tickets: AtomicU64::new(0),
        }
    }

    fn next_key(&self, priority: P) -> RankKey<P> {
        RankKey::new(priority, self.tickets.fetch_add(1, Ordering::Relaxed))
    }

    /// Takes the oldest entry among `keys` that is still in the skip list out of it.
    /// Keys a concurrent `pop` already took stay in place, that `pop` removes them from the index.
    fn unrank_oldest(&self, keys: &mut Vec<RankKey<P>>) -> bool {
        let Some(position) = keys.iter().position(|key| {
            let removed = self.ranks.remove(key).is_some();
            if !removed {
                trace!("key already taken by a concurrent pop");
            }
            removed
        }) else {
            return false;
        };
        keys.remove(position);
        true
    }

    /// Ranks `element` with a fresh key. Must be called with the element's index entry locked.
    fn rank(&self, keys: &mut Vec<RankKey<P>>, element: E, priority: P) {
        let key = self.next_key(priority);
        self.ranks.insert(key.clone(), element);
        keys.push(key);
    }

    #[cfg(test)]
    pub(crate) fn indexed_elements(&self) -> usize {
        self.index.len()
    }

    fn forget(&self, element: &E, key: &RankKey<P>) {
        if let Some(mut keys) = self.index.get_mut(element) {
            keys.retain(|queued| queued != key);
        }
        self.index.remove_if(element, |_, keys| keys.is_empty());
    }
}

impl<E, P> Default for SkipQueue<E, P>
where
    E: Eq + Hash + Clone + Send + Sync + 'static,
    P: Ord + Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E, P> fmt::Debug for SkipQueue<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkipQueue")
            .field("len", &self.ranks.len())
            .field("next_ticket", &self.tickets.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<E, P> PriorityQueue<E, P> for SkipQueue<E, P>
where
    E: Eq + Hash + Clone + Send + Sync + 'static,
    P: Ord + Clone + Send + Sync + 'static,
{
    fn add(&self, element: E, priority: P) {
        let mut keys = self.index.entry(element.clone()).or_default();
        self.rank(&mut keys, element, priority);
    }

    fn pop_entry(&self) -> Option<Entry<E, P>> {
        let popped = self.ranks.pop_front()?;
        let key = popped.key().clone();
        let element = popped.value().clone();

        self.forget(&element, &key);
        Some(Entry::new(element, key.into_priority()))
    }

    fn update(&self, element: E, priority: P) {
        let Some(mut keys) = self.index.get_mut(&element) else {
            return;
        };
        if self.unrank_oldest(&mut keys) {
            self.rank(&mut keys, element, priority);
        }
    }

    fn upsert(&self, element: E, priority: P) {
        let mut keys = self.index.entry(element.clone()).or_default();
        self.unrank_oldest(&mut keys);
        self.rank(&mut keys, element, priority);
    }

    /// Exact when no operation is in flight, may lag behind otherwise.
    fn len(&self) -> usize {
        self.ranks.len()
    }
}
