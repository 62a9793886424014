//! Reactive bridge over session changes.
//!
//! Consumers `subscribe` to be told when the session changed and read the
//! current state with `snapshot`. Notifications fire after the change is
//! persisted, so a snapshot taken inside or after a callback sees it.

mod feed;

pub use feed::*;

use std::sync::Arc;

use crate::models::Session;
use crate::session::SessionStore;
use crate::storage::{keys, ListenerId, StorageEvent, StoragePort};

/// Where a session change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// A mutation made through this handle.
    Local,
    /// A mutation made through another handle over the same storage.
    External,
}

pub struct SessionBridge {
    store: Arc<SessionStore>,
}

impl SessionBridge {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Register `callback` to run once per session change.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(ChangeOrigin) + Send + Sync + 'static,
    {
        let storage = Arc::clone(self.store.storage());
        let callback = Arc::new(callback);

        let local = {
            let callback = Arc::clone(&callback);
            storage.subscribe(
                keys::SESSION_CHANGED,
                Arc::new(move || (*callback)(ChangeOrigin::Local)),
            )
        };
        let external = storage.watch(Arc::new(move |event: &StorageEvent| {
            if event.key == keys::SESSION {
                (*callback)(ChangeOrigin::External);
            }
        }));

        Subscription {
            storage,
            listeners: vec![local, external],
        }
    }

    pub async fn snapshot(&self) -> Option<Session> {
        self.store.get_session().await
    }
}

/// Live registration from `SessionBridge::subscribe`. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes it"]
pub struct Subscription {
    storage: Arc<dyn StoragePort>,
    listeners: Vec<ListenerId>,
}

impl Subscription {
    /// Explicit disposer; equivalent to dropping the subscription.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        for id in self.listeners.drain(..) {
            self.storage.unsubscribe(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::storage::MemoryStorage;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn bridge_over(storage: Arc<MemoryStorage>) -> (Arc<SessionStore>, SessionBridge) {
        let store = Arc::new(SessionStore::new(storage, Duration::from_secs(60)));
        (Arc::clone(&store), SessionBridge::new(store))
    }

    fn counting(bridge: &SessionBridge) -> (Arc<AtomicUsize>, Subscription) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let subscription = bridge.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (count, subscription)
    }

    #[tokio::test]
    async fn test_every_subscriber_notified_once_per_change() {
        let (store, bridge) = bridge_over(Arc::new(MemoryStorage::new()));
        let (first, _first_sub) = counting(&bridge);
        let (second, second_sub) = counting(&bridge);

        store.set_session(Role::Packing).await;
        store.clear_session().await;
        assert_eq!(first.load(Ordering::SeqCst), 2);
        assert_eq!(second.load(Ordering::SeqCst), 2);

        second_sub.unsubscribe();
        store.set_session(Role::Admin).await;
        assert_eq!(first.load(Ordering::SeqCst), 3);
        assert_eq!(second.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_dropping_subscription_unsubscribes() {
        let (store, bridge) = bridge_over(Arc::new(MemoryStorage::new()));
        let (count, subscription) = counting(&bridge);
        drop(subscription);

        store.set_session(Role::Marketing).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_snapshot_after_notification_is_fresh() {
        let storage = Arc::new(MemoryStorage::new());
        let (store, bridge) = bridge_over(storage.clone());
        let seen = Arc::new(Mutex::new(Vec::new()));

        // The callback reads storage directly, as a render pass would.
        let probe = Arc::clone(&storage);
        let sink = Arc::clone(&seen);
        let _subscription = bridge.subscribe(move |_| sink.lock().push(probe.peek(keys::SESSION)));

        store.set_session(Role::Packing).await;
        store.clear_session().await;

        let seen = seen.lock();
        assert!(seen[0].as_deref().is_some_and(|raw| raw.contains("packing")));
        assert_eq!(seen[1], None);
    }

    #[tokio::test]
    async fn test_role_switch_never_passes_through_no_session() {
        let (store, bridge) = bridge_over(Arc::new(MemoryStorage::new()));
        store.set_session(Role::Packing).await;
        assert_eq!(bridge.snapshot().await.map(|s| s.role), Some(Role::Packing));

        store.switch_role(Role::Admin).await;
        assert_eq!(bridge.snapshot().await.map(|s| s.role), Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_changes_from_another_tab_notify_once() {
        let tab_a = Arc::new(MemoryStorage::new());
        let tab_b = Arc::new(tab_a.open_tab());
        let (store_a, bridge_a) = bridge_over(tab_a);
        let (_store_b, bridge_b) = bridge_over(tab_b);

        let origins = Arc::new(Mutex::new(Vec::new()));
        let sink_a = Arc::clone(&origins);
        let _sub_a = bridge_a.subscribe(move |origin| sink_a.lock().push(("a", origin)));
        let sink_b = Arc::clone(&origins);
        let _sub_b = bridge_b.subscribe(move |origin| sink_b.lock().push(("b", origin)));

        store_a.set_session(Role::Training).await;

        let mut seen = origins.lock().clone();
        seen.sort_by_key(|(tab, _)| *tab);
        assert_eq!(
            seen,
            vec![("a", ChangeOrigin::Local), ("b", ChangeOrigin::External)]
        );
        assert_eq!(bridge_b.snapshot().await.map(|s| s.role), Some(Role::Training));
    }

    #[tokio::test]
    async fn test_unrelated_keys_from_another_tab_are_ignored() {
        let tab_a = Arc::new(MemoryStorage::new());
        let tab_b = Arc::new(tab_a.open_tab());
        let (_store_b, bridge_b) = bridge_over(tab_b);
        let (count, _subscription) = counting(&bridge_b);

        tab_a.set("demo-data:schools", "{}").await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
