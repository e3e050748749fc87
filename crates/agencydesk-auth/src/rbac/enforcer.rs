//! Role hierarchy checks.

use agencydesk_entity::user::Role;

use crate::error::AuthError;

/// True iff `actual` ranks at or above `required`.
pub fn has_permission(actual: Role, required: Role) -> bool {
    actual.has_at_least(required)
}

/// [`has_permission`] as a `Result`, for use with `?`.
pub fn require_role(actual: Role, required: Role) -> Result<(), AuthError> {
    if has_permission(actual, required) {
        Ok(())
    } else {
        Err(AuthError::InsufficientRole { actual, required })
    }
}

/// Whether an actor with role `actor` may administer an account with role
/// `target`. Nobody manages someone who outranks them.
pub fn can_manage(actor: Role, target: Role) -> bool {
    actor >= target
}
