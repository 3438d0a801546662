use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Permission;

/// Role name used for RBAC.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// Yard administrator: may override statuses.
    pub const YARD_ADMIN: Role = Role(Cow::Borrowed("yard_admin"));

    /// Floor operator: drives the normal workflow only.
    pub const OPERATOR: Role = Role(Cow::Borrowed("operator"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Permissions implied by the built-in roles. Unknown roles imply none.
    pub fn implied_permissions(&self) -> Vec<Permission> {
        match self.as_str() {
            "yard_admin" => vec![Permission::STATUS_OVERRIDE],
            _ => Vec::new(),
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
