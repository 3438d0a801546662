use serde::{Deserialize, Serialize};

use stoneyard_core::UserId;

use crate::{Permission, Role};

/// An authenticated user as handed over by the authentication service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub roles: Vec<Role>,
    /// Permissions granted directly, on top of those implied by `roles`.
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Principal {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            roles: Vec::new(),
            permissions: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }

    /// Direct grants followed by role-implied ones.
    pub fn effective_permissions(&self) -> Vec<Permission> {
        let mut perms = self.permissions.clone();
        for role in &self.roles {
            for p in role.implied_permissions() {
                if !perms.contains(&p) {
                    perms.push(p);
                }
            }
        }
        perms
    }
}
