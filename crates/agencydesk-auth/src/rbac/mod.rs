//! Role-based access control over the `SMM < ADMIN < SUPER_ADMIN` hierarchy.

pub mod enforcer;

pub use enforcer::{can_manage, has_permission, require_role};
