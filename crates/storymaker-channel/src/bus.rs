//! Topic-keyed listener multiplexing.
//!
//! A [`ChannelBus`] maps a topic key to an ordered set of listeners and
//! dispatches each published message to every listener of its topic, in
//! subscription order. [`ChannelBus::subscribe`] returns a [`Subscription`]
//! guard; dropping the guard unregisters the listener.
//!
//! Publishing to a topic nobody listens to is a no-op, which is how
//! unknown message types are ignored on both ends of the connection.
//!
//! Listeners run outside the bus lock, so a listener may itself subscribe,
//! unsubscribe, or publish.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::trace;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Listeners<K, T> {
    next_id: u64,
    by_topic: BTreeMap<K, BTreeMap<u64, Listener<T>>>,
}

impl<K: Ord, T> Listeners<K, T> {
    fn remove(&mut self, topic: &K, id: u64) {
        if let Some(listeners) = self.by_topic.get_mut(topic) {
            listeners.remove(&id);
            if listeners.is_empty() {
                self.by_topic.remove(topic);
            }
        }
    }
}

fn lock<K, T>(inner: &Mutex<Listeners<K, T>>) -> MutexGuard<'_, Listeners<K, T>> {
    // A listener panicking elsewhere leaves the table itself consistent.
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Publish/subscribe hub keyed by topic.
pub struct ChannelBus<K, T> {
    inner: Arc<Mutex<Listeners<K, T>>>,
}

impl<K, T> Clone for ChannelBus<K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, T> Default for ChannelBus<K, T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Listeners {
                next_id: 0,
                by_topic: BTreeMap::new(),
            })),
        }
    }
}

impl<K, T> core::fmt::Debug for ChannelBus<K, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChannelBus").finish_non_exhaustive()
    }
}

impl<K, T> ChannelBus<K, T>
where
    K: Ord + Clone + Send + 'static,
    T: 'static,
{
    /// An empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for a topic.
    ///
    /// The listener stays registered until the returned guard is dropped.
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe(
        &self,
        topic: K,
        listener: impl Fn(&T) + Send + Sync + 'static,
    ) -> Subscription<K, T> {
        let mut table = lock(&self.inner);
        let id = table.next_id;
        table.next_id = table.next_id.wrapping_add(1);
        table
            .by_topic
            .entry(topic.clone())
            .or_default()
            .insert(id, Arc::new(listener));
        Subscription {
            bus: Arc::downgrade(&self.inner),
            topic,
            id,
        }
    }

    /// Dispatch a message to every listener of `topic`.
    ///
    /// Returns the number of listeners that received it.
    pub fn publish(&self, topic: &K, message: &T) -> usize {
        let listeners: Vec<Listener<T>> = lock(&self.inner)
            .by_topic
            .get(topic)
            .map(|listeners| listeners.values().cloned().collect())
            .unwrap_or_default();
        for listener in &listeners {
            listener(message);
        }
        trace!(listeners = listeners.len(), "message dispatched");
        listeners.len()
    }

    /// Number of listeners registered for a topic.
    pub fn listener_count(&self, topic: &K) -> usize {
        lock(&self.inner).by_topic.get(topic).map_or(0, BTreeMap::len)
    }
}

/// Registration handle of one listener.
///
/// Unregisters on drop. Outliving the bus is harmless.
pub struct Subscription<K: Ord, T> {
    bus: Weak<Mutex<Listeners<K, T>>>,
    topic: K,
    id: u64,
}

impl<K: Ord, T> Subscription<K, T> {
    /// Topic the listener is registered for.
    pub const fn topic(&self) -> &K {
        &self.topic
    }

    /// Unregister now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl<K: Ord, T> Drop for Subscription<K, T> {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            lock(&inner).remove(&self.topic, self.id);
        }
    }
}

impl<K: Ord + core::fmt::Debug, T> core::fmt::Debug for Subscription<K, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&String) + Send + Sync + Clone) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let listener = move |message: &String| lock_log(&sink).push(message.clone());
        (log, listener)
    }

    fn lock_log(log: &Mutex<Vec<String>>) -> MutexGuard<'_, Vec<String>> {
        log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[test]
    fn messages_reach_only_their_topic() {
        let bus: ChannelBus<&str, String> = ChannelBus::new();
        let (time_log, time_listener) = recorder();
        let (map_log, map_listener) = recorder();
        let _time = bus.subscribe("time", time_listener);
        let _map = bus.subscribe("map", map_listener);

        assert_eq!(bus.publish(&"time", &"08:00".to_owned()), 1);
        assert_eq!(bus.publish(&"weather", &"rain".to_owned()), 0);

        assert_eq!(*lock_log(&time_log), vec!["08:00".to_owned()]);
        assert!(lock_log(&map_log).is_empty());
    }

    #[test]
    fn dropping_the_guard_unregisters() {
        let bus: ChannelBus<&str, String> = ChannelBus::new();
        let (log, listener) = recorder();
        let first = bus.subscribe("message", listener.clone());
        let second = bus.subscribe("message", listener);
        assert_eq!(bus.listener_count(&"message"), 2);

        drop(first);
        assert_eq!(bus.publish(&"message", &"hello".to_owned()), 1);
        second.unsubscribe();
        assert_eq!(bus.listener_count(&"message"), 0);
        assert_eq!(bus.publish(&"message", &"bye".to_owned()), 0);
        assert_eq!(*lock_log(&log), vec!["hello".to_owned()]);
    }

    #[test]
    fn publish_order_is_preserved_per_topic() {
        let bus: ChannelBus<&str, String> = ChannelBus::new();
        let (log, listener) = recorder();
        let _guard = bus.subscribe("message", listener);
        for text in ["one", "two", "three"] {
            bus.publish(&"message", &text.to_owned());
        }
        assert_eq!(*lock_log(&log), vec!["one", "two", "three"]);
    }

    #[test]
    fn listeners_may_publish_reentrantly() {
        let bus: ChannelBus<&str, String> = ChannelBus::new();
        let echoed = Arc::new(AtomicUsize::new(0));
        let relay = bus.clone();
        let _relay = bus.subscribe("ready", move |_: &String| {
            relay.publish(&"actions", &"menu".to_owned());
        });
        let counter = Arc::clone(&echoed);
        let _actions = bus.subscribe("actions", move |_: &String| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish(&"ready", &String::new());
        assert_eq!(echoed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn guard_outliving_the_bus_is_harmless() {
        let bus: ChannelBus<&str, String> = ChannelBus::new();
        let guard = bus.subscribe("time", |_: &String| {});
        drop(bus);
        assert_eq!(guard.topic(), &"time");
        drop(guard);
    }
}
