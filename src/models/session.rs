//! Persisted demo session record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Role;

/// A live demo session. Only ever constructed with `active = true`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Session {
    pub active: bool,
    pub role: Role,
    pub established_at: DateTime<Utc>,
}

impl Session {
    pub fn new(role: Role) -> Self {
        Self {
            active: true,
            role,
            established_at: Utc::now(),
        }
    }

    /// Parse a persisted value, rejecting anything outside the record's shape.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let session: Session = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        if !session.active {
            return Err("persisted session is not active".to_string());
        }
        Ok(session)
    }
}

/// Request body for demo sign-in and role switch.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub role: String,
}
