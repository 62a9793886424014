//! One-time "demo data was reset" notice.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{keys, StoragePort};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ResetRecord {
    raised_at: DateTime<Utc>,
}

/// Raised when corrupted state was repaired; observed until acknowledged or
/// until `ttl` has passed since it was raised.
pub struct ResetFlag {
    storage: Arc<dyn StoragePort>,
    ttl: Duration,
}

impl ResetFlag {
    pub fn new(storage: Arc<dyn StoragePort>, ttl: Duration) -> Self {
        Self { storage, ttl }
    }

    pub async fn raise(&self) {
        let record = ResetRecord {
            raised_at: Utc::now(),
        };
        let raw = match serde_json::to_string(&record) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Failed to encode reset flag: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set(keys::RESET_FLAG, &raw).await {
            tracing::warn!("Failed to persist reset flag: {}", e);
        }
    }

    pub async fn is_raised(&self) -> bool {
        let raw = match self.storage.get(keys::RESET_FLAG).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!("Failed to read reset flag: {}", e);
                return false;
            }
        };

        let record: ResetRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Discarding corrupt reset flag: {}", e);
                self.clear().await;
                return false;
            }
        };

        // A timestamp ahead of the clock counts as just raised.
        let elapsed = (Utc::now() - record.raised_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        if elapsed < self.ttl {
            return true;
        }
        self.clear().await;
        false
    }

    pub async fn clear(&self) {
        if let Err(e) = self.storage.remove(keys::RESET_FLAG).await {
            tracing::warn!("Failed to clear reset flag: {}", e);
        }
    }
}
