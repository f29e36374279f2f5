use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use jfs_types::{Key, Scope};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, warn};

use crate::error::{WatchError, WatchResult};
use crate::event::{Event, Notification};

/// Default live-event headroom of a subscriber queue, on top of its snapshot.
pub const DEFAULT_CAPACITY: usize = 64;

/// Largest live-event headroom a hub accepts.
pub const MAX_CAPACITY: usize = 1 << 20;

/// Upper bound `tokio` places on a broadcast channel.
const MAX_QUEUE: usize = usize::MAX >> 1;

/// Which events a subscription receives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WatchFilter {
    pub scope: Scope,
}

impl WatchFilter {
    pub fn new(scope: Scope) -> Self {
        Self { scope }
    }

    /// Returns `true` if the given event matches this filter.
    pub fn matches<T>(&self, event: &Event<T>) -> bool {
        self.scope.contains(&event.key)
    }
}

/// Registry entry: a filter paired with the sending half of the queue.
struct Subscriber<T> {
    filter: WatchFilter,
    sender: broadcast::Sender<Event<T>>,
}

/// Per-store registry of live subscriptions.
///
/// Broadcasts take the read lock, registration and removal take the write
/// lock. Queues are `tokio` broadcast channels with a single receiver each,
/// which gives drop-oldest overflow with an exact lag count.
pub struct WatchHub<T> {
    subscribers: RwLock<HashMap<u64, Subscriber<T>>>,
    next_id: AtomicU64,
    capacity: usize,
}

impl<T: Clone + Send + Sync + 'static> WatchHub<T> {
    /// Create a hub whose subscriber queues hold their snapshot plus at
    /// least `capacity` live events, clamped to `1..=MAX_CAPACITY`.
    ///
    /// Queue sizes are rounded up to a power of two, so a subscriber may
    /// buffer more than requested before it starts losing events.
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            capacity: capacity.clamp(1, MAX_CAPACITY),
        })
    }

    /// Register a subscription that first replays `snapshot` as `Added`
    /// events, then receives every matching broadcast.
    ///
    /// The queue is sized to hold the whole snapshot plus the live capacity,
    /// so the replay itself never overflows. Callers that need the snapshot
    /// and the registration to be atomic with respect to mutations must hold
    /// their mutation lock across the listing and this call.
    ///
    /// Fails with [`WatchError::QueueTooLarge`] when the snapshot is too big
    /// for any queue.
    pub fn subscribe(
        self: &Arc<Self>,
        filter: WatchFilter,
        snapshot: Vec<(Key, T)>,
    ) -> WatchResult<Subscription<T>> {
        let size = queue_size(snapshot.len(), self.capacity)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = broadcast::channel(size);

        let replayed = snapshot.len();
        for (key, object) in snapshot {
            // The receiver is alive, so this cannot fail.
            let _ = sender.send(Event::added(key, object));
        }

        let mut subs = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        subs.retain(|_, sub| sub.sender.receiver_count() > 0);
        subs.insert(id, Subscriber { filter: filter.clone(), sender });
        debug!(id, scope = %filter.scope, replayed, "watch registered");

        Ok(Subscription {
            id,
            receiver,
            hub: Arc::downgrade(self),
        })
    }

    /// Queue `event` on every matching subscriber. Never blocks.
    pub fn broadcast(&self, event: &Event<T>) {
        let subs = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for (id, sub) in subs.iter() {
            if !sub.filter.matches(event) {
                continue;
            }
            // A send error only means the consumer is gone; it is pruned on
            // the next registration.
            if sub.sender.send(event.clone()).is_err() {
                debug!(id, "dropping event for departed subscriber");
            }
        }
    }
}

impl<T> WatchHub<T> {
    /// Live-event headroom of each subscriber queue, after clamping.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remove a subscription from the registry. Returns `true` if it was
    /// registered.
    pub fn unsubscribe(&self, id: u64) -> bool {
        let removed = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some();
        if removed {
            debug!(id, "watch stopped");
        }
        removed
    }

    /// Current number of registered subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn queue_size(snapshot: usize, capacity: usize) -> WatchResult<usize> {
    snapshot
        .checked_add(capacity)
        .filter(|size| *size <= MAX_QUEUE)
        .ok_or(WatchError::QueueTooLarge { snapshot, capacity })
}

/// The consumer end of a watch.
///
/// Created by `Watch`, destroyed by [`Subscription::stop`] or by dropping it.
pub struct Subscription<T> {
    id: u64,
    receiver: broadcast::Receiver<Event<T>>,
    hub: Weak<WatchHub<T>>,
}

impl<T: Clone> Subscription<T> {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Block until the next notification. Returns `None` once the stream has
    /// ended.
    ///
    /// Must not be called from inside an async runtime; use
    /// [`Subscription::recv_async`] there.
    pub fn recv(&mut self) -> Option<Notification<T>> {
        let received = self.receiver.blocking_recv();
        self.translate(received)
    }

    /// Await the next notification. Returns `None` once the stream has ended.
    pub async fn recv_async(&mut self) -> Option<Notification<T>> {
        let received = self.receiver.recv().await;
        self.translate(received)
    }

    /// Take the next notification if one is queued.
    pub fn try_recv(&mut self) -> WatchResult<Option<Notification<T>>> {
        match self.receiver.try_recv() {
            Ok(event) => Ok(Some(Notification::Event(event))),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Lagged(missed)) => {
                warn!(id = self.id, missed, "watch consumer fell behind");
                Ok(Some(Notification::Gap { missed }))
            }
            Err(TryRecvError::Closed) => Err(WatchError::Closed),
        }
    }

    /// Drain everything currently queued.
    pub fn drain(&mut self) -> WatchResult<Vec<Notification<T>>> {
        let mut out = Vec::new();
        while let Some(notification) = self.try_recv()? {
            out.push(notification);
        }
        Ok(out)
    }

    /// Stop the subscription. Nothing is queued for it afterwards.
    pub fn stop(self) {
        // Removal happens in Drop.
    }

    fn translate(&self, received: Result<Event<T>, RecvError>) -> Option<Notification<T>> {
        match received {
            Ok(event) => Some(Notification::Event(event)),
            Err(RecvError::Lagged(missed)) => {
                warn!(id = self.id, missed, "watch consumer fell behind");
                Some(Notification::Gap { missed })
            }
            Err(RecvError::Closed) => None,
        }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.unsubscribe(self.id);
        }
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
