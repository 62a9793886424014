//! Business records held by the demo data collections.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A school serviced by the operator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Amount a school still owes, in minor currency units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutstandingAmount {
    pub school_id: String,
    pub amount_minor: i64,
    pub updated_at: DateTime<Utc>,
}

/// Dispatch pipeline stage for a school's kit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PackingStage {
    #[default]
    Pending,
    Packing,
    Packed,
    Dispatched,
    Delivered,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackingStatus {
    pub school_id: String,
    pub stage: PackingStage,
    pub updated_at: DateTime<Utc>,
}

/// Number of kits packed for one class and theme at a school.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PackingCount {
    pub school_id: String,
    pub class_name: String,
    pub theme: String,
    pub count: u32,
}

impl PackingCount {
    /// Composite key the packing-counts collection is indexed by.
    pub fn key(&self) -> String {
        packing_count_key(&self.school_id, &self.class_name, &self.theme)
    }
}

pub fn packing_count_key(school_id: &str, class_name: &str, theme: &str) -> String {
    format!("{}::{}::{}", school_id, class_name, theme)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VisitStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingVisit {
    pub id: String,
    pub school_id: String,
    pub trainer: String,
    pub visit_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: VisitStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    #[default]
    Open,
    Resolved,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AcademicQuery {
    pub id: String,
    pub school_id: String,
    pub subject: String,
    pub question: String,
    #[serde(default)]
    pub status: QueryStatus,
    pub raised_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Request body for creating a school.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchoolRequest {
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePackingStatusRequest {
    pub stage: PackingStage,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetOutstandingRequest {
    pub amount_minor: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPackingCountRequest {
    pub school_id: String,
    pub class_name: String,
    pub theme: String,
    pub count: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrainingVisitRequest {
    pub school_id: String,
    pub trainer: String,
    pub visit_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAcademicQueryRequest {
    pub school_id: String,
    pub subject: String,
    pub question: String,
}
