//! Self-service account operations.

use std::sync::Arc;

use tracing::{info, warn};

use agencydesk_auth::password::{PasswordHasher, PasswordValidator};
use agencydesk_core::error::AppError;
use agencydesk_database::store::UserStore;
use agencydesk_entity::user::User;

use crate::context::RequestContext;

/// Operations any authenticated staff member performs on their own account.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish_non_exhaustive()
    }
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
    ) -> Self {
        Self {
            users,
            hasher,
            validator,
        }
    }

    pub async fn get_profile(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.users
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Changes the actor's password after re-checking the current one.
    ///
    /// Tokens issued before the change stay valid until they expire.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        current_password: String,
        new_password: String,
    ) -> Result<(), AppError> {
        let user = self.get_profile(ctx).await?;

        let valid = self
            .hasher
            .verify_password_blocking(current_password.clone(), user.password_hash.clone())
            .await?;
        if !valid {
            warn!(user_id = %user.id, "Password change rejected: wrong current password");
            return Err(AppError::validation("Current password is incorrect"));
        }

        self.validator
            .validate_not_same(&current_password, &new_password)?;
        self.validator
            .validate(&new_password, &[user.email.as_str(), user.name.as_str()])?;

        let hash = self.hasher.hash_password_blocking(new_password).await?;
        self.users.update_password(user.id, &hash).await?;

        info!(user_id = %user.id, "Password changed");
        Ok(())
    }
}
