use std::fmt::{Debug, Formatter};

use crate::selection::Selection;

/// Handle for removing a subscriber again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Subscriber = Box<dyn FnMut(&Selection) + Send>;

/// Single-slot, last-write-wins channel from the timeline to its dependents.
///
/// Dependents are notified synchronously in commit order; there is no
/// queueing or debouncing here. Debouncing of the resulting downstream
/// query belongs to the query layer.
///
/// `latest()` distinguishes "no broadcast has happened yet" (`None`) from
/// "explicitly cleared" (`Some(Selection::None)`) so dependents can tell an
/// initial load apart from a cleared window.
#[derive(Default)]
pub struct SelectionBroadcaster {
    latest: Option<Selection>,
    commits: u64,
    next_id: u64,
    subscribers: Vec<(SubscriberId, Subscriber)>,
}

impl SelectionBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&Selection) + Send + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns `true` if the subscriber was registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Overwrite the slot and notify every subscriber, in commit order.
    pub fn publish(&mut self, selection: Selection) {
        self.commits += 1;
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&selection);
        }
        self.latest = Some(selection);
    }

    /// The current slot: `None` until the first commit.
    pub fn latest(&self) -> Option<&Selection> {
        self.latest.as_ref()
    }

    pub fn has_active_selection(&self) -> bool {
        self.latest
            .as_ref()
            .is_some_and(Selection::is_active)
    }

    pub fn commit_count(&self) -> u64 {
        self.commits
    }
}

impl Debug for SelectionBroadcaster {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionBroadcaster")
            .field("latest", &self.latest)
            .field("commits", &self.commits)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::DateKey;

    fn date(key: &str) -> DateKey {
        DateKey::normalize(key).expect("valid date")
    }

    #[test]
    fn distinguishes_never_broadcast_from_cleared() {
        let mut broadcaster = SelectionBroadcaster::new();
        assert!(broadcaster.latest().is_none());

        broadcaster.publish(Selection::None);

        assert_eq!(broadcaster.latest(), Some(&Selection::None));
        assert!(!broadcaster.has_active_selection());
    }

    #[test]
    fn notifies_subscribers_in_commit_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut broadcaster = SelectionBroadcaster::new();
        broadcaster.subscribe(move |selection| {
            sink.lock().expect("sink lock").push(selection.clone());
        });

        broadcaster.publish(Selection::point(date("2025-04-06")));
        broadcaster.publish(Selection::None);

        let seen = seen.lock().expect("sink lock");
        assert_eq!(
            *seen,
            vec![Selection::point(date("2025-04-06")), Selection::None]
        );
        assert_eq!(broadcaster.commit_count(), 2);
    }

    #[test]
    fn unsubscribed_dependents_stop_receiving() {
        let seen = Arc::new(Mutex::new(0u32));
        let sink = Arc::clone(&seen);

        let mut broadcaster = SelectionBroadcaster::new();
        let id = broadcaster.subscribe(move |_| {
            *sink.lock().expect("sink lock") += 1;
        });

        broadcaster.publish(Selection::None);
        assert!(broadcaster.unsubscribe(id));
        broadcaster.publish(Selection::None);

        assert_eq!(*seen.lock().expect("sink lock"), 1);
    }
}
