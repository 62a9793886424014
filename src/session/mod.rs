//! Demo session store.
//!
//! Owns the persisted session record. Storage failures and corrupt records
//! never escape: callers see "no session" and the failure is logged.

mod reset;

pub use reset::*;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::models::{Role, Session};
use crate::storage::{keys, StoragePort};

pub struct SessionStore {
    storage: Arc<dyn StoragePort>,
    reset: ResetFlag,
    // Serializes mutations, so a role switch cannot revive a session cleared
    // between its check and its write.
    writes: Mutex<()>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn StoragePort>, reset_notice_ttl: Duration) -> Self {
        let reset = ResetFlag::new(Arc::clone(&storage), reset_notice_ttl);
        Self {
            storage,
            reset,
            writes: Mutex::new(()),
        }
    }

    pub fn storage(&self) -> &Arc<dyn StoragePort> {
        &self.storage
    }

    /// Start (or replace) the demo session for `role`, then notify.
    pub async fn set_session(&self, role: Role) {
        {
            let _writes = self.writes.lock().await;
            self.persist(role).await;
        }
        self.storage.notify(keys::SESSION_CHANGED);
    }

    /// Replace the role of the running session. The record is rewritten whole,
    /// so readers see either the old role or the new one, never no session.
    /// Returns false, without writing or notifying, when no session is active.
    pub async fn switch_role(&self, role: Role) -> bool {
        {
            let _writes = self.writes.lock().await;
            if !self.is_active().await {
                tracing::debug!(role = %role, "Role switch ignored, no demo session");
                return false;
            }
            tracing::info!(role = %role, "Switching demo role");
            self.persist(role).await;
        }
        self.storage.notify(keys::SESSION_CHANGED);
        true
    }

    pub async fn get_session(&self) -> Option<Session> {
        let raw = match self.storage.get(keys::SESSION).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read demo session: {}", e);
                return None;
            }
        };

        match Session::parse(&raw) {
            Ok(session) => Some(session),
            Err(reason) => {
                self.recover_corrupt(&reason).await;
                None
            }
        }
    }

    /// Remove the session, then notify. Notifies even if nothing was stored.
    pub async fn clear_session(&self) {
        {
            let _writes = self.writes.lock().await;
            match self.storage.remove(keys::SESSION).await {
                Ok(()) => tracing::info!("Demo session cleared"),
                Err(e) => tracing::warn!("Failed to clear demo session: {}", e),
            }
        }
        self.storage.notify(keys::SESSION_CHANGED);
    }

    pub async fn is_active(&self) -> bool {
        self.get_session().await.is_some_and(|s| s.active)
    }

    pub async fn was_data_reset(&self) -> bool {
        self.reset.is_raised().await
    }

    pub async fn clear_data_reset_flag(&self) {
        self.reset.clear().await;
    }

    // A record that could not be written must not leave the previous one
    // readable, so a failed write falls back to removing it.
    async fn persist(&self, role: Role) {
        let session = Session::new(role);
        let result = match serde_json::to_string(&session) {
            Ok(raw) => self.storage.set(keys::SESSION, &raw).await,
            Err(e) => {
                tracing::warn!("Failed to encode demo session: {}", e);
                self.discard_stale().await;
                return;
            }
        };
        match result {
            Ok(()) => tracing::info!(role = %role, "Demo session started"),
            Err(e) => {
                tracing::warn!(role = %role, "Failed to persist demo session: {}", e);
                self.discard_stale().await;
            }
        }
    }

    async fn discard_stale(&self) {
        if let Err(e) = self.storage.remove(keys::SESSION).await {
            tracing::warn!("Failed to remove stale demo session: {}", e);
        }
    }

    // Repair does not notify: it is reached from reads, and a read that
    // notified would re-trigger the readers it serves.
    async fn recover_corrupt(&self, reason: &str) {
        tracing::warn!("Discarding corrupt demo session: {}", reason);
        if let Err(e) = self.storage.remove(keys::SESSION).await {
            tracing::warn!("Failed to remove corrupt demo session: {}", e);
        }
        self.reset.raise().await;
    }
}
