//! Storage port for persisted demo state.
//!
//! Everything the session and data stores persist goes through `StoragePort`:
//! plain UTF-8 text values under string keys, plus the notification plumbing
//! the reactive bridge builds on. SQLite backs it in the service, memory in tests.

mod bus;
#[cfg(test)]
mod memory;
mod sqlite;

pub use bus::*;
#[cfg(test)]
pub use memory::*;
pub use sqlite::*;

use async_trait::async_trait;

/// Storage keys and channels. The session and data namespaces never overlap.
pub mod keys {
    #[cfg(test)]
    pub const SESSION_NAMESPACE: &str = "demo-session:";
    #[cfg(test)]
    pub const DATA_NAMESPACE: &str = "demo-data:";

    pub const SESSION: &str = "demo-session:record";
    pub const RESET_FLAG: &str = "demo-session:data-reset";

    /// Channel notified after every session mutation.
    pub const SESSION_CHANGED: &str = "demo-session:changed";
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Storage refused the operation (quota, disabled, private mode).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage backend error: {0}")]
    Backend(#[from] sqlx::Error),
}

/// Key/value persistence plus change notification.
///
/// Handles created with `open_tab` on a backing share its data and its
/// `EventBus` but have distinct origins, the way browser tabs share storage.
#[async_trait]
pub trait StoragePort: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes the value, then raises a storage event for other handles.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the key. Raises a storage event only if something was removed.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    fn bus(&self) -> &EventBus;

    fn origin(&self) -> Origin;

    /// Deliver a channel notification to listeners on this handle.
    fn notify(&self, channel: &str) {
        self.bus().notify(self.origin(), channel);
    }

    fn subscribe(&self, channel: &str, listener: ChannelListener) -> ListenerId {
        self.bus().subscribe(self.origin(), channel, listener)
    }

    /// Listen for keys changed through other handles.
    fn watch(&self, listener: StorageListener) -> ListenerId {
        self.bus().watch(self.origin(), listener)
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.bus().unsubscribe(id)
    }
}
