//! Administrative status override.
//!
//! The edit form historically let any user type a new status. Here that
//! capability needs an [`OverrideGrant`], which can only be obtained by
//! authorizing a principal for `blocks.status.override`.

use stoneyard_auth::{authorize, AuthzError, Permission, Principal};
use stoneyard_core::UserId;

/// Proof that a principal was authorized to override a status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideGrant {
    granted_to: UserId,
}

impl OverrideGrant {
    pub fn issue(principal: &Principal) -> Result<Self, AuthzError> {
        authorize(principal, &Permission::STATUS_OVERRIDE)?;
        Ok(Self {
            granted_to: principal.user_id,
        })
    }

    pub fn granted_to(&self) -> UserId {
        self.granted_to
    }
}
