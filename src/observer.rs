//! Synchronous publish/subscribe channel.
//!
//! An [`Observable`] keeps an ordered registry of subscriber callbacks.
//! Delivery is synchronous, follows subscription order and hands each
//! callback a reference to the published value; nothing is copied or kept.

use std::fmt;

/// Handle returned by [`Observable::subscribe`], used to cancel a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

/// Registry of callbacks notified each time a value is fired.
pub struct Observable<T> {
    subscribers: Vec<(SubscriptionId, Callback<T>)>,
    next_id: u64,
}

impl<T> Observable<T> {
    pub fn new() -> Self {
        Observable {
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Register `callback` for future values.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Register `callback` and immediately deliver `current` to it.
    pub fn subscribe_past<F>(&mut self, current: &T, mut callback: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        callback(current);
        self.subscribe(callback)
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn cancel_subscription(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn cancel_all_subscriptions(&mut self) {
        self.subscribers.clear();
    }

    /// Deliver `value` to every subscriber.
    pub fn fire(&mut self, value: &T) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(value);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[test]
    fn test_delivery_in_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut observable = Observable::new();

        let first = Arc::clone(&log);
        observable.subscribe(move |v: &u32| first.lock().push(("first", *v)));
        let second = Arc::clone(&log);
        observable.subscribe(move |v: &u32| second.lock().push(("second", *v)));

        observable.fire(&7);
        assert_eq!(*log.lock(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn test_cancel_subscription() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut observable = Observable::new();

        let sink = Arc::clone(&log);
        let id = observable.subscribe(move |v: &u32| sink.lock().push(*v));
        observable.fire(&1);
        assert!(observable.cancel_subscription(id));
        assert!(!observable.cancel_subscription(id));
        observable.fire(&2);

        assert_eq!(*log.lock(), vec![1]);
        assert_eq!(observable.subscriber_count(), 0);
    }

    #[test]
    fn test_subscribe_past_delivers_current_value() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut observable = Observable::new();

        let sink = Arc::clone(&log);
        observable.subscribe_past(&5u32, move |v: &u32| sink.lock().push(*v));
        observable.fire(&6);

        assert_eq!(*log.lock(), vec![5, 6]);
    }

    #[test]
    fn test_fires_values_that_cannot_be_cloned() {
        struct Snapshot(Vec<u32>);

        let seen = Rc::new(RefCell::new(0));
        let mut observable = Observable::new();
        let sink = Rc::clone(&seen);
        observable.subscribe(move |s: &Snapshot| *sink.borrow_mut() += s.0.len());

        let snapshot = Snapshot(vec![1, 2, 3]);
        observable.fire(&snapshot);
        observable.fire(&snapshot);
        assert_eq!(*seen.borrow(), 6);
    }
}
