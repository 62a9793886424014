//! Collection definitions and their shape validators.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::models::{
    AcademicQuery, OutstandingAmount, PackingCount, PackingStatus, QueryStatus, School,
    TrainingVisit,
};

/// Names one persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollectionId {
    Schools,
    Outstanding,
    PackingStatus,
    PackingCounts,
    TrainingVisits,
    AcademicQueries,
}

impl CollectionId {
    pub const ALL: [CollectionId; 6] = [
        CollectionId::Schools,
        CollectionId::Outstanding,
        CollectionId::PackingStatus,
        CollectionId::PackingCounts,
        CollectionId::TrainingVisits,
        CollectionId::AcademicQueries,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionId::Schools => "schools",
            CollectionId::Outstanding => "outstanding",
            CollectionId::PackingStatus => "packing-status",
            CollectionId::PackingCounts => "packing-counts",
            CollectionId::TrainingVisits => "training-visits",
            CollectionId::AcademicQueries => "academic-queries",
        }
    }

    /// Storage key, inside the data namespace.
    pub fn key(&self) -> &'static str {
        match self {
            CollectionId::Schools => "demo-data:schools",
            CollectionId::Outstanding => "demo-data:outstanding",
            CollectionId::PackingStatus => "demo-data:packing-status",
            CollectionId::PackingCounts => "demo-data:packing-counts",
            CollectionId::TrainingVisits => "demo-data:training-visits",
            CollectionId::AcademicQueries => "demo-data:academic-queries",
        }
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollectionId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown collection '{}'", s))
    }
}

/// A persisted collection: its id, value shape, and shape invariant.
pub trait Collection {
    const ID: CollectionId;
    type Value: Serialize + DeserializeOwned + Default + Send + Sync;

    fn validate(value: &Self::Value) -> Result<(), String>;
}

pub struct Schools;
pub struct OutstandingAmounts;
pub struct PackingStatuses;
pub struct PackingCounts;
pub struct TrainingVisits;
pub struct AcademicQueries;

impl Collection for Schools {
    const ID: CollectionId = CollectionId::Schools;
    type Value = BTreeMap<String, School>;

    fn validate(value: &Self::Value) -> Result<(), String> {
        check_keyed(value, |school| school.id.clone())?;
        match value.values().find(|school| school.name.trim().is_empty()) {
            Some(school) => Err(format!("school {} has an empty name", school.id)),
            None => Ok(()),
        }
    }
}

impl Collection for OutstandingAmounts {
    const ID: CollectionId = CollectionId::Outstanding;
    type Value = BTreeMap<String, OutstandingAmount>;

    fn validate(value: &Self::Value) -> Result<(), String> {
        check_keyed(value, |amount| amount.school_id.clone())?;
        match value.values().find(|amount| amount.amount_minor < 0) {
            Some(amount) => Err(format!(
                "negative outstanding amount for school {}",
                amount.school_id
            )),
            None => Ok(()),
        }
    }
}

impl Collection for PackingStatuses {
    const ID: CollectionId = CollectionId::PackingStatus;
    type Value = BTreeMap<String, PackingStatus>;

    fn validate(value: &Self::Value) -> Result<(), String> {
        check_keyed(value, |status| status.school_id.clone())
    }
}

impl Collection for PackingCounts {
    const ID: CollectionId = CollectionId::PackingCounts;
    type Value = BTreeMap<String, PackingCount>;

    fn validate(value: &Self::Value) -> Result<(), String> {
        check_keyed(value, PackingCount::key)
    }
}

impl Collection for TrainingVisits {
    const ID: CollectionId = CollectionId::TrainingVisits;
    type Value = Vec<TrainingVisit>;

    fn validate(value: &Self::Value) -> Result<(), String> {
        check_unique_ids(value.iter().map(|visit| visit.id.as_str()))
    }
}

impl Collection for AcademicQueries {
    const ID: CollectionId = CollectionId::AcademicQueries;
    type Value = Vec<AcademicQuery>;

    fn validate(value: &Self::Value) -> Result<(), String> {
        check_unique_ids(value.iter().map(|query| query.id.as_str()))?;
        for query in value {
            let resolved = query.status == QueryStatus::Resolved;
            if resolved != query.resolved_at.is_some() {
                return Err(format!(
                    "academic query {} has inconsistent resolution",
                    query.id
                ));
            }
        }
        Ok(())
    }
}

fn check_keyed<T>(map: &BTreeMap<String, T>, key_of: impl Fn(&T) -> String) -> Result<(), String> {
    for (key, record) in map {
        let expected = key_of(record);
        if *key != expected {
            return Err(format!("entry '{}' is stored under '{}'", expected, key));
        }
    }
    Ok(())
}

fn check_unique_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Result<(), String> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.is_empty() {
            return Err("record with an empty id".to_string());
        }
        if !seen.insert(id) {
            return Err(format!("duplicate id '{}'", id));
        }
    }
    Ok(())
}
