//! Authenticated principals and their roles.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Personnel tier carried as a custom claim by the identity provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    CoreEmployee,
    NormalEmployee,
    Intern,
    /// Authenticated but not yet given a tier
    #[default]
    Guest,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "admin" => Ok(Role::Admin),
            "core_employee" | "core" => Ok(Role::CoreEmployee),
            "normal_employee" | "employee" => Ok(Role::NormalEmployee),
            "intern" => Ok(Role::Intern),
            "guest" => Ok(Role::Guest),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

impl Role {
    /// Storage string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::CoreEmployee => "core_employee",
            Role::NormalEmployee => "normal_employee",
            Role::Intern => "intern",
            Role::Guest => "guest",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// The principal on whose behalf an operation runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    /// Stable unique identifier from the identity provider
    pub id: String,
    /// Display name, stamped on verifications
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }
}
