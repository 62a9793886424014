//! In-memory storage backing, used by tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{EventBus, Origin, StorageError, StorageEvent, StorageEventKind, StoragePort};

#[derive(Default)]
struct Shared {
    entries: Mutex<BTreeMap<String, String>>,
    bus: EventBus,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_removes: AtomicBool,
}

/// A map shared by every tab opened from it.
pub struct MemoryStorage {
    shared: Arc<Shared>,
    origin: Origin,
}

impl MemoryStorage {
    pub fn new() -> Self {
        let shared = Arc::new(Shared::default());
        let origin = shared.bus.new_origin();
        Self { shared, origin }
    }

    /// Another handle over the same entries, with its own origin.
    pub fn open_tab(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            origin: self.shared.bus.new_origin(),
        }
    }

    /// Make every subsequent read fail, as disabled storage would.
    pub fn fail_reads(&self, fail: bool) {
        self.shared.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail, as a full quota would. Removals
    /// still succeed.
    pub fn fail_writes(&self, fail: bool) {
        self.shared.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_removes(&self, fail: bool) {
        self.shared.fail_removes.store(fail, Ordering::SeqCst);
    }

    /// Read a value without going through the port.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.shared.entries.lock().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.shared.entries.lock().keys().cloned().collect()
    }

    fn check(flag: &AtomicBool, reason: &str) -> Result<(), StorageError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(reason.to_string()));
        }
        Ok(())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoragePort for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::check(&self.shared.fail_reads, "storage disabled")?;
        Ok(self.shared.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::check(&self.shared.fail_writes, "quota exceeded")?;
        self.shared
            .entries
            .lock()
            .insert(key.to_string(), value.to_string());
        self.shared.bus.broadcast(
            self.origin,
            StorageEvent {
                key: key.to_string(),
                kind: StorageEventKind::Set,
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::check(&self.shared.fail_removes, "storage disabled")?;
        let removed = self.shared.entries.lock().remove(key).is_some();
        if removed {
            self.shared.bus.broadcast(
                self.origin,
                StorageEvent {
                    key: key.to_string(),
                    kind: StorageEventKind::Removed,
                },
            );
        }
        Ok(())
    }

    fn bus(&self) -> &EventBus {
        &self.shared.bus
    }

    fn origin(&self) -> Origin {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn test_tabs_share_entries() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.open_tab();

        tab_a.set("k", "v").await.unwrap();
        assert_eq!(tab_b.get("k").await.unwrap().as_deref(), Some("v"));

        tab_b.remove("k").await.unwrap();
        assert_eq!(tab_a.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_removing_missing_key_raises_no_event() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.open_tab();
        let events = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&events);
        tab_b.watch(Arc::new(move |_: &StorageEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        tab_a.remove("missing").await.unwrap();
        assert_eq!(events.load(Ordering::SeqCst), 0);

        tab_a.set("k", "v").await.unwrap();
        tab_a.remove("k").await.unwrap();
        assert_eq!(events.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let storage = MemoryStorage::new();
        storage.set("k", "v").await.unwrap();

        storage.fail_writes(true);
        assert!(matches!(
            storage.set("k", "w").await,
            Err(StorageError::Unavailable(_))
        ));
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v"));

        storage.fail_removes(true);
        assert!(storage.remove("k").await.is_err());
        assert_eq!(storage.peek("k").as_deref(), Some("v"));

        storage.fail_reads(true);
        assert!(storage.get("k").await.is_err());

        // A full quota still lets keys be removed.
        storage.fail_removes(false);
        storage.remove("k").await.unwrap();
        assert_eq!(storage.peek("k"), None);
    }
}
