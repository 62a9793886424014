//! Local data store for demo-mode business records.
//!
//! Each collection lives under its own key and is read and validated on its
//! own, so a corrupt collection is discarded without touching the others.
//! There is no cross-collection transaction: adapters that touch several
//! collections write them one after another and a failure part way leaves the
//! earlier writes in place.
//!
//! Mutations take the store's write lock for their whole read-modify-write
//! cycle, and read through `load`, which reports storage failures instead of
//! reading them as empty.

mod adapters;
mod collections;

pub use collections::*;

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::session::ResetFlag;
use crate::storage::{StorageError, StoragePort};

/// What happens to demo data when the demo session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitPolicy {
    #[default]
    KeepData,
    WipeData,
}

pub struct LocalDataStore {
    storage: Arc<dyn StoragePort>,
    reset: Option<ResetFlag>,
    writes: Mutex<()>,
}

impl LocalDataStore {
    pub fn new(storage: Arc<dyn StoragePort>) -> Self {
        Self {
            storage,
            reset: None,
            writes: Mutex::new(()),
        }
    }

    /// Also raise `flag` whenever a collection is repaired.
    pub fn with_reset_flag(mut self, flag: ResetFlag) -> Self {
        self.reset = Some(flag);
        self
    }

    /// Read a collection. Missing, unreadable, or corrupt values read as empty.
    pub async fn read<C: Collection>(&self) -> C::Value {
        self.load::<C>().await.unwrap_or_else(|e| {
            tracing::warn!(collection = %C::ID, "Failed to read collection: {}", e);
            C::Value::default()
        })
    }

    /// Read a collection for update. Missing or corrupt values read as empty;
    /// a storage failure is returned, so nothing gets written over data that
    /// could not be read.
    async fn load<C: Collection>(&self) -> Result<C::Value, StorageError> {
        let key = C::ID.key();
        let raw = match self.storage.get(key).await? {
            Some(raw) => raw,
            None => return Ok(C::Value::default()),
        };

        let parsed = serde_json::from_str::<C::Value>(&raw)
            .map_err(|e| e.to_string())
            .and_then(|value| C::validate(&value).map(|()| value));

        match parsed {
            Ok(value) => Ok(value),
            Err(reason) => {
                tracing::warn!(collection = %C::ID, "Discarding corrupt collection: {}", reason);
                if let Err(e) = self.storage.remove(key).await {
                    tracing::warn!(collection = %C::ID, "Failed to remove corrupt collection: {}", e);
                }
                if let Some(flag) = &self.reset {
                    flag.raise().await;
                }
                Ok(C::Value::default())
            }
        }
    }

    /// Persist a collection. Returns false if the write was not durable.
    pub async fn write<C: Collection>(&self, value: &C::Value) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(collection = %C::ID, "Failed to encode collection: {}", e);
                return false;
            }
        };
        match self.storage.set(C::ID.key(), &raw).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(collection = %C::ID, "Failed to persist collection: {}", e);
                false
            }
        }
    }

    /// Persist a collection as part of a mutation; a write that did not land
    /// fails the mutation.
    async fn persist<C: Collection>(&self, value: &C::Value) -> Result<(), AppError> {
        if self.write::<C>(value).await {
            Ok(())
        } else {
            Err(AppError::Unavailable(format!(
                "Could not persist the {} collection",
                C::ID
            )))
        }
    }

    /// Read any collection as JSON.
    pub async fn read_json(&self, id: CollectionId) -> Value {
        match id {
            CollectionId::Schools => self.read_as_json::<Schools>().await,
            CollectionId::Outstanding => self.read_as_json::<OutstandingAmounts>().await,
            CollectionId::PackingStatus => self.read_as_json::<PackingStatuses>().await,
            CollectionId::PackingCounts => self.read_as_json::<PackingCounts>().await,
            CollectionId::TrainingVisits => self.read_as_json::<TrainingVisits>().await,
            CollectionId::AcademicQueries => self.read_as_json::<AcademicQueries>().await,
        }
    }

    /// Replace any collection from JSON. Input that does not match the
    /// collection's shape is rejected before anything is written.
    pub async fn write_json(&self, id: CollectionId, value: Value) -> Result<bool, String> {
        let _writes = self.writes.lock().await;
        match id {
            CollectionId::Schools => self.write_from_json::<Schools>(value).await,
            CollectionId::Outstanding => self.write_from_json::<OutstandingAmounts>(value).await,
            CollectionId::PackingStatus => self.write_from_json::<PackingStatuses>(value).await,
            CollectionId::PackingCounts => self.write_from_json::<PackingCounts>(value).await,
            CollectionId::TrainingVisits => self.write_from_json::<TrainingVisits>(value).await,
            CollectionId::AcademicQueries => self.write_from_json::<AcademicQueries>(value).await,
        }
    }

    /// Remove every collection.
    pub async fn clear_all(&self) {
        let _writes = self.writes.lock().await;
        for id in CollectionId::ALL {
            if let Err(e) = self.storage.remove(id.key()).await {
                tracing::warn!(collection = %id, "Failed to clear collection: {}", e);
            }
        }
        tracing::info!("Demo data cleared");
    }

    async fn read_as_json<C: Collection>(&self) -> Value {
        let value = self.read::<C>().await;
        serde_json::to_value(&value).unwrap_or_else(|e| {
            tracing::warn!(collection = %C::ID, "Failed to encode collection: {}", e);
            Value::Null
        })
    }

    async fn write_from_json<C: Collection>(&self, value: Value) -> Result<bool, String> {
        let value: C::Value = serde_json::from_value(value).map_err(|e| e.to_string())?;
        C::validate(&value)?;
        Ok(self.write::<C>(&value).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PackingCount, School};
    use crate::storage::{keys, MemoryStorage};
    use chrono::Utc;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn store() -> (Arc<MemoryStorage>, LocalDataStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = LocalDataStore::new(storage.clone());
        (storage, store)
    }

    fn one_school() -> BTreeMap<String, School> {
        let mut schools = BTreeMap::new();
        schools.insert(
            "s1".to_string(),
            School {
                id: "s1".to_string(),
                name: "Green Valley".to_string(),
                city: Some("Pune".to_string()),
                contact_person: None,
                contact_phone: None,
                created_at: Utc::now(),
            },
        );
        schools
    }

    #[tokio::test]
    async fn test_missing_collection_reads_empty() {
        let (_storage, store) = store();
        assert!(store.read::<Schools>().await.is_empty());
        assert!(store.read::<TrainingVisits>().await.is_empty());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let (_storage, store) = store();
        let schools = one_school();
        assert!(store.write::<Schools>(&schools).await);
        assert_eq!(store.read::<Schools>().await, schools);
    }

    #[tokio::test]
    async fn test_corruption_is_isolated_per_collection() {
        let (storage, store) = store();
        let schools = one_school();
        store.write::<Schools>(&schools).await;
        storage
            .set(CollectionId::PackingCounts.key(), "[1, 2")
            .await
            .unwrap();

        assert!(store.read::<PackingCounts>().await.is_empty());
        assert_eq!(storage.get(CollectionId::PackingCounts.key()).await.unwrap(), None);
        assert_eq!(store.read::<Schools>().await, schools);
    }

    #[tokio::test]
    async fn test_shape_invalid_collection_is_discarded() {
        let (storage, store) = store();
        // Parses, but the entry is stored under the wrong key.
        let mut counts = BTreeMap::new();
        counts.insert(
            "wrong".to_string(),
            PackingCount {
                school_id: "s1".to_string(),
                class_name: "Grade 1".to_string(),
                theme: "Ocean".to_string(),
                count: 3,
            },
        );
        storage
            .set(
                CollectionId::PackingCounts.key(),
                &serde_json::to_string(&counts).unwrap(),
            )
            .await
            .unwrap();

        assert!(store.read::<PackingCounts>().await.is_empty());
        assert_eq!(storage.get(CollectionId::PackingCounts.key()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_collection_repair_raises_flag_only_when_configured() {
        let storage = Arc::new(MemoryStorage::new());
        let quiet = LocalDataStore::new(storage.clone());
        let flagged = LocalDataStore::new(storage.clone())
            .with_reset_flag(ResetFlag::new(storage.clone(), Duration::from_secs(60)));
        let flag = ResetFlag::new(storage.clone(), Duration::from_secs(60));

        storage.set(CollectionId::Schools.key(), "oops").await.unwrap();
        quiet.read::<Schools>().await;
        assert!(!flag.is_raised().await);

        storage.set(CollectionId::Schools.key(), "oops").await.unwrap();
        flagged.read::<Schools>().await;
        assert!(flag.is_raised().await);
    }

    #[tokio::test]
    async fn test_failed_write_is_reported_not_thrown() {
        let (storage, store) = store();
        storage.fail_writes(true);
        assert!(!store.write::<Schools>(&one_school()).await);

        storage.fail_writes(false);
        assert!(store.read::<Schools>().await.is_empty());
    }

    #[tokio::test]
    async fn test_write_json_validates_before_writing() {
        let (storage, store) = store();
        let bad = json!({ "s1": { "id": "s2", "name": "X", "createdAt": "2026-01-01T00:00:00Z" } });
        assert!(store.write_json(CollectionId::Schools, bad).await.is_err());
        assert_eq!(storage.get(CollectionId::Schools.key()).await.unwrap(), None);

        let good = json!({ "s1": { "id": "s1", "name": "X", "createdAt": "2026-01-01T00:00:00Z" } });
        assert_eq!(store.write_json(CollectionId::Schools, good).await, Ok(true));
        assert_eq!(store.read_json(CollectionId::Schools).await["s1"]["name"], "X");
        assert_eq!(store.read_json(CollectionId::TrainingVisits).await, json!([]));
    }

    #[tokio::test]
    async fn test_clear_all_leaves_session_namespace() {
        let (storage, store) = store();
        storage.set(keys::SESSION, "kept").await.unwrap();
        store.write::<Schools>(&one_school()).await;
        store.write::<TrainingVisits>(&Vec::new()).await;

        store.clear_all().await;

        assert_eq!(storage.keys(), vec![keys::SESSION.to_string()]);
    }
}
