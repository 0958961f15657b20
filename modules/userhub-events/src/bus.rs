//! EventBus — topic registry and fan-out.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::channel::{Channel, ChannelInner};

/// Topic-keyed publish/subscribe bus.
///
/// Cheap to clone; all clones share one registry. The registry maps each
/// topic to the set of live channels, holding them weakly so a dropped
/// subscriber can never be kept alive by the bus.
pub struct EventBus<T> {
    inner: Arc<BusInner<T>>,
}

pub(crate) struct BusInner<T> {
    registry: Mutex<HashMap<String, Vec<Weak<ChannelInner<T>>>>>,
    /// Per-channel queue capacity. `None` means unbounded.
    capacity: Option<usize>,
    next_id: AtomicU64,
    dropped_total: AtomicU64,
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventBus<T> {
    /// Bus with unbounded per-channel queues.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Bus with bounded per-channel queues. When a queue is full the oldest
    /// event is dropped and counted; the publisher is never blocked.
    pub fn bounded(capacity: usize) -> Self {
        Self::build(Some(capacity))
    }

    /// Bus with an optional capacity, for wiring straight from config.
    pub fn with_queue_capacity(capacity: Option<usize>) -> Self {
        Self::build(capacity)
    }

    fn build(capacity: Option<usize>) -> Self {
        Self {
            inner: Arc::new(BusInner {
                registry: Mutex::new(HashMap::new()),
                capacity,
                next_id: AtomicU64::new(1),
                dropped_total: AtomicU64::new(0),
            }),
        }
    }

    /// Register a new channel on `topic`.
    ///
    /// The returned [`Channel`] is the sole owner of its delivery queue.
    /// Dropping or closing it deregisters it from the bus.
    pub fn subscribe(&self, topic: impl Into<String>) -> Channel<T> {
        let topic = topic.into();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let chan = Arc::new(ChannelInner::new(id, topic.clone()));

        let mut registry = lock(&self.inner.registry);
        registry
            .entry(topic)
            .or_default()
            .push(Arc::downgrade(&chan));
        drop(registry);

        tracing::debug!(channel = id, "subscriber registered");
        Channel::new(chan, self.clone())
    }

    /// Remove `channel` from the registry and mark it closed.
    ///
    /// Safe to call more than once; unsubscribing a channel that was already
    /// removed is a no-op.
    pub(crate) fn unsubscribe(&self, channel: &Arc<ChannelInner<T>>) {
        {
            let mut registry = lock(&self.inner.registry);
            if let Some(list) = registry.get_mut(channel.topic()) {
                list.retain(|w| {
                    w.upgrade().is_some_and(|live| !Arc::ptr_eq(&live, channel))
                });
                if list.is_empty() {
                    registry.remove(channel.topic());
                }
            }
        }
        channel.close();
    }

    /// Close every channel and clear the registry. Waiting subscribers wake
    /// up, drain whatever is already queued, and terminate.
    pub fn shutdown(&self) {
        let mut registry = lock(&self.inner.registry);
        for (_, list) in registry.drain() {
            for weak in list {
                if let Some(chan) = weak.upgrade() {
                    chan.close();
                }
            }
        }
    }

    /// Number of live channels on `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        let registry = lock(&self.inner.registry);
        registry
            .get(topic)
            .map(|list| list.iter().filter(|w| w.strong_count() > 0).count())
            .unwrap_or(0)
    }

    /// Total events dropped across all channels since the bus was built.
    pub fn dropped_total(&self) -> u64 {
        self.inner.dropped_total.load(Ordering::Relaxed)
    }
}

impl<T: Clone> EventBus<T> {
    /// Deliver `payload` to every channel registered on `topic` right now.
    ///
    /// Enqueue-only: a slow or stalled subscriber never blocks the publisher
    /// or delivery to other channels. Channels whose owner has gone away are
    /// pruned in passing. Enqueueing happens under the registry lock so
    /// concurrent publishes serialize into a single per-topic order.
    pub fn publish(&self, topic: &str, payload: T) {
        let mut registry = lock(&self.inner.registry);
        let Some(list) = registry.get_mut(topic) else {
            return;
        };

        list.retain(|weak| match weak.upgrade() {
            Some(chan) => {
                chan.push(
                    payload.clone(),
                    self.inner.capacity,
                    &self.inner.dropped_total,
                );
                true
            }
            None => false,
        });

        if list.is_empty() {
            registry.remove(topic);
        }
    }
}

/// Lock that treats poisoning as recovered rather than fatal.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
