//! State-changed signal: observers notified after every applied dispatch.

use std::fmt;

use crate::binding::EventKind;
use crate::syntax::Selector;

/// Emitted once per successfully applied event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChanged {
    /// Increments by one per applied event, starting at 1.
    pub generation: u64,
    pub event: EventKind,
    pub selector: Selector,
    /// Member whose binding handled the event.
    pub member: String,
}

/// Identifies a subscription, for [`unsubscribe`](super::Dispatcher::unsubscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&StateChanged)>;

/// Subscribed observers, notified in subscription order.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<(ObserverId, Observer)>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, observer: impl FnMut(&StateChanged) + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(observer)));
        id
    }

    /// Returns whether `id` was subscribed.
    pub(crate) fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&mut self, change: &StateChanged) {
        for (_, observer) in &mut self.entries {
            observer(change);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .finish()
    }
}
