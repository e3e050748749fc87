//! Request context carrying the authenticated actor.

use chrono::{DateTime, Utc};
use serde::Serialize;

use agencydesk_auth::rbac;
use agencydesk_core::error::AppError;
use agencydesk_entity::user::{Role, User};

/// Who is acting on the current request.
///
/// Built by the authentication middleware from the freshly loaded user, so
/// `role` reflects the stored role rather than the one baked into the token.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(user_id: i64, email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            email: email.into(),
            role,
            request_time: Utc::now(),
        }
    }

    pub fn from_user(user: &User) -> Self {
        Self::new(user.id, user.email.clone(), user.role)
    }

    /// `Forbidden` unless the actor holds at least `required`.
    pub fn require_role(&self, required: Role) -> Result<(), AppError> {
        rbac::require_role(self.role, required).map_err(AppError::from)
    }

    pub fn is_admin_or_above(&self) -> bool {
        rbac::has_permission(self.role, Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use agencydesk_core::error::ErrorKind;

    use super::*;

    #[test]
    fn test_require_role() {
        let smm = RequestContext::new(1, "s@a.test", Role::Smm);
        assert!(smm.require_role(Role::Smm).is_ok());
        assert_eq!(
            smm.require_role(Role::Admin).unwrap_err().kind,
            ErrorKind::Forbidden
        );
        assert!(!smm.is_admin_or_above());

        let owner = RequestContext::new(2, "o@a.test", Role::SuperAdmin);
        assert!(owner.require_role(Role::Admin).is_ok());
        assert!(owner.is_admin_or_above());
    }
}
