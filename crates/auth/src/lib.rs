//! `stoneyard-auth` — permission checks for privileged workflow operations.
//!
//! Identity comes from an external authentication service; this crate only
//! decides whether an already-resolved principal holds a permission.

pub mod authorize;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{authorize, AuthzError};
pub use permissions::Permission;
pub use principal::Principal;
pub use roles::Role;
