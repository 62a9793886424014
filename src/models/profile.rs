//! Synthetic user profile shown in place of a backend profile.

use serde::Serialize;

use super::Role;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DemoProfile {
    pub role: Role,
    pub display_name: &'static str,
    pub department: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
    pub dashboard_path: &'static str,
}
