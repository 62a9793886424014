//! Listener registry shared by every handle over one storage backing.
//!
//! Two kinds of delivery:
//! - channel notifications, raised explicitly with `notify` and delivered only
//!   to listeners registered through the same handle (same tab);
//! - storage events, raised by a successful `set`/`remove` and delivered only
//!   to watchers registered through *other* handles (other tabs).

use std::sync::Arc;

use parking_lot::Mutex;

/// Identifies one registered listener.
pub type ListenerId = u64;

/// Identifies one handle ("tab") over a shared backing.
pub type Origin = u64;

pub type ChannelListener = Arc<dyn Fn() + Send + Sync>;
pub type StorageListener = Arc<dyn Fn(&StorageEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageEventKind {
    Set,
    Removed,
}

/// A key changed through another handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub kind: StorageEventKind,
}

enum Listener {
    Channel {
        channel: String,
        callback: ChannelListener,
    },
    Storage {
        callback: StorageListener,
    },
}

struct Registered {
    id: ListenerId,
    origin: Origin,
    listener: Listener,
}

#[derive(Default)]
struct BusInner {
    next_id: ListenerId,
    next_origin: Origin,
    listeners: Vec<Registered>,
}

#[derive(Default)]
pub struct EventBus {
    inner: Mutex<BusInner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an origin for a new handle.
    pub fn new_origin(&self) -> Origin {
        let mut inner = self.inner.lock();
        inner.next_origin += 1;
        inner.next_origin
    }

    pub fn subscribe(&self, origin: Origin, channel: &str, callback: ChannelListener) -> ListenerId {
        self.register(
            origin,
            Listener::Channel {
                channel: channel.to_string(),
                callback,
            },
        )
    }

    pub fn watch(&self, origin: Origin, callback: StorageListener) -> ListenerId {
        self.register(origin, Listener::Storage { callback })
    }

    /// Returns false if the id was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.listeners.len();
        inner.listeners.retain(|r| r.id != id);
        inner.listeners.len() != before
    }

    pub fn notify(&self, origin: Origin, channel: &str) {
        // Callbacks run without the lock held so they can (un)subscribe.
        let callbacks: Vec<ChannelListener> = {
            let inner = self.inner.lock();
            inner
                .listeners
                .iter()
                .filter(|r| r.origin == origin)
                .filter_map(|r| match &r.listener {
                    Listener::Channel { channel: c, callback } if c == channel => {
                        Some(Arc::clone(callback))
                    }
                    _ => None,
                })
                .collect()
        };
        tracing::debug!(channel, listeners = callbacks.len(), "notifying channel");
        for callback in callbacks {
            callback();
        }
    }

    pub fn broadcast(&self, origin: Origin, event: StorageEvent) {
        let callbacks: Vec<StorageListener> = {
            let inner = self.inner.lock();
            inner
                .listeners
                .iter()
                .filter(|r| r.origin != origin)
                .filter_map(|r| match &r.listener {
                    Listener::Storage { callback } => Some(Arc::clone(callback)),
                    _ => None,
                })
                .collect()
        };
        for callback in callbacks {
            callback(&event);
        }
    }

    fn register(&self, origin: Origin, listener: Listener) -> ListenerId {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.listeners.push(Registered {
            id,
            origin,
            listener,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, ChannelListener) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let callback: ChannelListener = Arc::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (count, callback)
    }

    #[test]
    fn test_notify_reaches_same_origin_channel_only() {
        let bus = EventBus::new();
        let tab_a = bus.new_origin();
        let tab_b = bus.new_origin();

        let (a_count, a_cb) = counter();
        let (b_count, b_cb) = counter();
        let (other_count, other_cb) = counter();
        bus.subscribe(tab_a, "changed", a_cb);
        bus.subscribe(tab_b, "changed", b_cb);
        bus.subscribe(tab_a, "other", other_cb);

        bus.notify(tab_a, "changed");

        assert_eq!(a_count.load(Ordering::SeqCst), 1);
        assert_eq!(b_count.load(Ordering::SeqCst), 0);
        assert_eq!(other_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_broadcast_skips_originating_handle() {
        let bus = EventBus::new();
        let tab_a = bus.new_origin();
        let tab_b = bus.new_origin();

        let seen = Arc::new(Mutex::new(Vec::new()));
        for origin in [tab_a, tab_b] {
            let seen = Arc::clone(&seen);
            bus.watch(
                origin,
                Arc::new(move |event: &StorageEvent| seen.lock().push((origin, event.key.clone()))),
            );
        }

        bus.broadcast(
            tab_a,
            StorageEvent {
                key: "k".to_string(),
                kind: StorageEventKind::Set,
            },
        );

        assert_eq!(*seen.lock(), vec![(tab_b, "k".to_string())]);
    }

    #[test]
    fn test_listener_may_unsubscribe_itself() {
        let bus = Arc::new(EventBus::new());
        let origin = bus.new_origin();
        let count = Arc::new(AtomicUsize::new(0));
        let id_slot = Arc::new(Mutex::new(None::<ListenerId>));

        let id = {
            let inner_bus = Arc::clone(&bus);
            let count = Arc::clone(&count);
            let id_slot = Arc::clone(&id_slot);
            bus.subscribe(
                origin,
                "changed",
                Arc::new(move || {
                    count.fetch_add(1, Ordering::SeqCst);
                    let registered = *id_slot.lock();
                    if let Some(id) = registered {
                        inner_bus.unsubscribe(id);
                    }
                }),
            )
        };
        *id_slot.lock() = Some(id);

        bus.notify(origin, "changed");
        bus.notify(origin, "changed");

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!bus.unsubscribe(id));
    }
}
