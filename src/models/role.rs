//! Staff roles available to a demo session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A staff role. Each demo session runs as exactly one of these.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Marketing,
    Packing,
    Academic,
    Accounts,
    Training,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Marketing,
        Role::Packing,
        Role::Academic,
        Role::Accounts,
        Role::Training,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Marketing => "marketing",
            Role::Packing => "packing",
            Role::Academic => "academic",
            Role::Accounts => "accounts",
            Role::Training => "training",
        }
    }

    /// Dashboard path the navigation table assigns to this role.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Marketing => "/marketing",
            Role::Packing => "/packing",
            Role::Academic => "/academic",
            Role::Accounts => "/accounts",
            Role::Training => "/training",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
