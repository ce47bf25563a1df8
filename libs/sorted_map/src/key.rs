use std::cmp::Reverse;

/// Skip list key of one queued entry.
///
/// Keys sort by descending priority, so the front of the map is the most urgent entry. Equal
/// priorities fall back to the ticket handed out when the entry was queued: two distinct entries
/// never compare equal, while a key always equals itself, which is what removal relies on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct RankKey<P> {
    urgency: Reverse<P>,
    ticket: u64,
}

impl<P> RankKey<P> {
    pub(crate) fn new(priority: P, ticket: u64) -> Self {
        Self {
            urgency: Reverse(priority),
            ticket,
        }
    }

    pub(crate) fn into_priority(self) -> P {
        self.urgency.0
    }
}
