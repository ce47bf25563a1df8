//! Doubly-linked sequence of [`Entry`]s kept in descending priority order.
//!
//! Nodes live in a slot vector and link to each other by index, freed slots are recycled through
//! a free list. Unlinking and inserting next to a known node are O(1), locating a position is a
//! linear walk from the front.

use std::mem;

use triage::Entry;

type NodeId = usize;

#[derive(Debug)]
struct Node<E, P> {
    entry: Entry<E, P>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

#[derive(Debug)]
enum Slot<E, P> {
    Occupied(Node<E, P>),
    /// Points to the next free slot.
    Vacant(Option<NodeId>),
}

#[derive(Debug)]
pub struct OrderedList<E, P> {
    slots: Vec<Slot<E, P>>,
    free: Option<NodeId>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl<E, P> Default for OrderedList<E, P> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<E, P> OrderedList<E, P> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: None,
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Removes the most urgent entry.
    pub fn pop_front(&mut self) -> Option<Entry<E, P>> {
        let head = self.head?;
        Some(self.unlink(head))
    }

    /// Walks the entries from the most urgent to the least urgent one.
    #[cfg(test)]
    pub fn iter(&self) -> Iter<'_, E, P> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn node(&self, id: NodeId) -> &Node<E, P> {
        match &self.slots[id] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => unreachable!("linked node {id} points to a vacant slot"),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<E, P> {
        match &mut self.slots[id] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => unreachable!("linked node {id} points to a vacant slot"),
        }
    }

    fn allocate(&mut self, node: Node<E, P>) -> NodeId {
        match self.free {
            Some(id) => {
                let Slot::Vacant(next_free) =
                    mem::replace(&mut self.slots[id], Slot::Occupied(node))
                else {
                    unreachable!("free list points to an occupied slot");
                };
                self.free = next_free;
                id
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                self.slots.len() - 1
            }
        }
    }

    /// Links a new node between `prev` and `next`, which must be neighbours.
    fn link(&mut self, entry: Entry<E, P>, prev: Option<NodeId>, next: Option<NodeId>) {
        let id = self.allocate(Node { entry, prev, next });

        match prev {
            Some(prev) => self.node_mut(prev).next = Some(id),
            None => self.head = Some(id),
        }
        match next {
            Some(next) => self.node_mut(next).prev = Some(id),
            None => self.tail = Some(id),
        }
        self.len += 1;
    }

    fn push_front(&mut self, entry: Entry<E, P>) {
        self.link(entry, None, self.head);
    }

    fn push_back(&mut self, entry: Entry<E, P>) {
        self.link(entry, self.tail, None);
    }

    fn insert_before(&mut self, entry: Entry<E, P>, at: NodeId) {
        let prev = self.node(at).prev;
        self.link(entry, prev, Some(at));
    }

    fn unlink(&mut self, id: NodeId) -> Entry<E, P> {
        let Slot::Occupied(node) = mem::replace(&mut self.slots[id], Slot::Vacant(self.free))
        else {
            unreachable!("unlinking vacant slot {id}");
        };
        self.free = Some(id);

        match node.prev {
            Some(prev) => self.node_mut(prev).next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.node_mut(next).prev = node.prev,
            None => self.tail = node.prev,
        }
        self.len -= 1;

        node.entry
    }
}

impl<E, P: Ord> OrderedList<E, P> {
    /// Inserts `entry` behind every entry of greater or equal priority, so equal priorities are
    /// popped in insertion order.
    pub fn insert(&mut self, entry: Entry<E, P>) {
        let (Some(head), Some(tail)) = (self.head, self.tail) else {
            self.push_back(entry);
            return;
        };

        if entry.priority > self.node(head).entry.priority {
            self.push_front(entry);
            return;
        }
        if entry.priority <= self.node(tail).entry.priority {
            self.push_back(entry);
            return;
        }

        let mut cursor = self.node(head).next;
        while let Some(id) = cursor {
            let node = self.node(id);
            if node.entry.priority < entry.priority {
                self.insert_before(entry, id);
                return;
            }
            cursor = node.next;
        }
        unreachable!("the tail has a lower priority than the inserted entry");
    }
}

impl<E: PartialEq, P> OrderedList<E, P> {
    /// Unlinks the most urgent entry of `element`.
    pub fn remove(&mut self, element: &E) -> Option<Entry<E, P>> {
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let node = self.node(id);
            if node.entry.element == *element {
                return Some(self.unlink(id));
            }
            cursor = node.next;
        }
        None
    }
}

#[cfg(test)]
pub struct Iter<'a, E, P> {
    list: &'a OrderedList<E, P>,
    cursor: Option<NodeId>,
}

#[cfg(test)]
impl<'a, E, P> Iterator for Iter<'a, E, P> {
    type Item = &'a Entry<E, P>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?);
        self.cursor = node.next;
        Some(&node.entry)
    }
}
