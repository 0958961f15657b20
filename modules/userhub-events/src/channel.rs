//! Channel — per-subscription delivery queue.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::bus::{lock, EventBus};

pub(crate) struct ChannelInner<T> {
    id: u64,
    topic: String,
    state: Mutex<State<T>>,
    notify: Notify,
    dropped: AtomicU64,
}

struct State<T> {
    queue: VecDeque<T>,
    closed: bool,
}

impl<T> ChannelInner<T> {
    pub(crate) fn new(id: u64, topic: String) -> Self {
        Self {
            id,
            topic,
            state: Mutex::new(State {
                queue: VecDeque::new(),
                closed: false,
            }),
            notify: Notify::new(),
            dropped: AtomicU64::new(0),
        }
    }

    pub(crate) fn topic(&self) -> &str {
        &self.topic
    }

    /// Enqueue one event. Never blocks. Under a bounded capacity the oldest
    /// queued event is dropped to make room, and the drop is counted.
    pub(crate) fn push(&self, value: T, capacity: Option<usize>, bus_dropped: &AtomicU64) {
        let mut state = lock(&self.state);
        if state.closed {
            return;
        }
        if let Some(cap) = capacity {
            while state.queue.len() >= cap.max(1) {
                state.queue.pop_front();
                self.dropped.fetch_add(1, Ordering::Relaxed);
                bus_dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    topic = %self.topic,
                    channel = self.id,
                    "delivery queue full, dropped oldest event"
                );
            }
        }
        state.queue.push_back(value);
        drop(state);
        self.notify.notify_one();
    }

    /// Mark the channel closed and wake its consumer. Reentrant-safe.
    pub(crate) fn close(&self) {
        let mut state = lock(&self.state);
        if state.closed {
            return;
        }
        state.closed = true;
        drop(state);
        self.notify.notify_one();
    }
}

/// Handle for one active subscription.
///
/// Exactly one `Channel` exists per live subscription, exclusively owned by
/// the subscriber that created it. Dropping it (or calling [`Channel::close`])
/// deregisters it from the bus promptly; a deregistered channel never sees
/// another event.
pub struct Channel<T> {
    inner: Arc<ChannelInner<T>>,
    bus: EventBus<T>,
}

impl<T> Channel<T> {
    pub(crate) fn new(inner: Arc<ChannelInner<T>>, bus: EventBus<T>) -> Self {
        Self { inner, bus }
    }

    pub fn topic(&self) -> &str {
        self.inner.topic()
    }

    /// Events dropped from this channel's queue under a bounded capacity.
    pub fn dropped(&self) -> u64 {
        self.inner.dropped.load(Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.inner.state).closed
    }

    /// Queued events not yet consumed.
    pub fn len(&self) -> usize {
        lock(&self.inner.state).queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deregister from the bus and mark closed. Closing twice is a no-op.
    /// Already-queued events remain drainable via [`Channel::recv`].
    pub fn close(&self) {
        self.bus.unsubscribe(&self.inner);
    }

    /// Receive the next event, suspending until one arrives or the channel is
    /// torn down. Returns `None` once the channel is closed and drained.
    ///
    /// The wait holds no lock on the bus registry.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            // Create the wakeup future before checking state so a push
            // between the check and the await is never missed.
            let notified = self.inner.notify.notified();
            {
                let mut state = lock(&self.inner.state);
                if let Some(value) = state.queue.pop_front() {
                    return Some(value);
                }
                if state.closed {
                    return None;
                }
            }
            notified.await;
        }
    }

    /// Receive without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        lock(&self.inner.state).queue.pop_front()
    }

    /// Wrap the channel as a stream of events. The stream ends when the
    /// channel is torn down; dropping the stream tears the channel down.
    pub fn into_stream(mut self) -> impl futures::Stream<Item = T> {
        async_stream::stream! {
            while let Some(event) = self.recv().await {
                yield event;
            }
        }
    }
}

impl<T> Drop for Channel<T> {
    fn drop(&mut self) {
        let dropped = self.dropped();
        if dropped > 0 {
            tracing::debug!(
                topic = %self.inner.topic(),
                dropped,
                "subscriber closed with dropped events"
            );
        }
        self.bus.unsubscribe(&self.inner);
    }
}
