//! Staff administration: list, create, update, password reset.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use agencydesk_auth::password::{PasswordHasher, PasswordValidator};
use agencydesk_auth::rbac::can_manage;
use agencydesk_core::config::BootstrapConfig;
use agencydesk_core::error::AppError;
use agencydesk_core::types::pagination::{PageRequest, PageResponse};
use agencydesk_database::store::UserStore;
use agencydesk_entity::user::{NewUser, Role, User, UserPatch};

use crate::context::RequestContext;

/// Input for creating a staff account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: Role,
}

/// Administrative user management. Every operation requires ADMIN+.
///
/// Rules on top of the role gate: nobody grants a role above their own,
/// nobody modifies an account that outranks them, and nobody deactivates or
/// demotes themselves.
#[derive(Clone)]
pub struct AdminUserService {
    users: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
}

impl std::fmt::Debug for AdminUserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminUserService")
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

impl AdminUserService {
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

    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<User>, AppError> {
        ctx.require_role(Role::Admin)?;
        self.users.list(page).await
    }

    pub async fn get_user(&self, ctx: &RequestContext, user_id: i64) -> Result<User, AppError> {
        ctx.require_role(Role::Admin)?;
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }

    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        req: CreateUserRequest,
    ) -> Result<User, AppError> {
        ctx.require_role(Role::Admin)?;
        if req.role > ctx.role {
            return Err(AppError::forbidden(format!(
                "Cannot create a {} account as {}",
                req.role, ctx.role
            )));
        }

        self.validator
            .validate(&req.password, &[req.email.as_str(), req.name.as_str()])?;
        let new_user = NewUser {
            email: req.email,
            name: req.name,
            password_hash: String::new(),
            role: req.role,
        }
        .validated()?;

        if self.users.find_by_email(&new_user.email).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Email '{}' is already registered",
                new_user.email
            )));
        }

        let password_hash = self.hasher.hash_password_blocking(req.password).await?;
        let user = self
            .users
            .create(&NewUser {
                password_hash,
                ..new_user
            })
            .await?;

        info!(
            admin_id = %ctx.user_id,
            new_user_id = %user.id,
            email = %user.email,
            role = %user.role,
            "User created by admin"
        );
        Ok(user)
    }

    /// Applies a patch to a staff account.
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: i64,
        patch: UserPatch,
    ) -> Result<User, AppError> {
        let patch = patch.validated()?;
        let target = self.manageable_target(ctx, user_id).await?;

        if let Some(role) = patch.role {
            if role > ctx.role {
                return Err(AppError::forbidden(format!(
                    "Cannot grant {role} as {}",
                    ctx.role
                )));
            }
        }

        if user_id == ctx.user_id {
            if patch.is_active == Some(false) {
                return Err(AppError::forbidden("Cannot deactivate your own account"));
            }
            if patch.role.is_some_and(|role| role < target.role) {
                return Err(AppError::forbidden("Cannot demote your own account"));
            }
        }

        let user = self.users.update(user_id, &patch).await?;
        info!(
            admin_id = %ctx.user_id,
            target_id = %user_id,
            role = %user.role,
            is_active = user.is_active,
            "User updated by admin"
        );
        Ok(user)
    }

    /// Sets a new password for a staff account.
    pub async fn reset_password(
        &self,
        ctx: &RequestContext,
        user_id: i64,
        new_password: String,
    ) -> Result<(), AppError> {
        let target = self.manageable_target(ctx, user_id).await?;
        self.validator
            .validate(&new_password, &[target.email.as_str(), target.name.as_str()])?;

        let hash = self.hasher.hash_password_blocking(new_password).await?;
        self.users.update_password(user_id, &hash).await?;

        info!(admin_id = %ctx.user_id, target_id = %user_id, "Password reset by admin");
        Ok(())
    }

    /// Creates the first SUPER_ADMIN from `config` when no account exists.
    ///
    /// Returns `None` when no bootstrap credentials are configured or the
    /// store already holds users. The password policy applies as usual.
    pub async fn bootstrap_super_admin(
        &self,
        config: &BootstrapConfig,
    ) -> Result<Option<User>, AppError> {
        let Some((email, password)) = config.credentials() else {
            return Ok(None);
        };
        if self.users.count().await? > 0 {
            info!(email = %email, "User store not empty; skipping admin bootstrap");
            return Ok(None);
        }

        self.validator
            .validate(password, &[email, config.admin_name.as_str()])?;
        let new_user = NewUser {
            email: email.to_string(),
            name: config.admin_name.clone(),
            password_hash: String::new(),
            role: Role::SuperAdmin,
        }
        .validated()?;

        let password_hash = self.hasher.hash_password_blocking(password.to_string()).await?;
        let user = self
            .users
            .create(&NewUser {
                password_hash,
                ..new_user
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, "Bootstrapped SUPER_ADMIN account");
        Ok(Some(user))
    }

    async fn manageable_target(&self, ctx: &RequestContext, user_id: i64) -> Result<User, AppError> {
        let target = self.get_user(ctx, user_id).await?;
        if !can_manage(ctx.role, target.role) {
            return Err(AppError::forbidden(format!(
                "Cannot modify a {} account as {}",
                target.role, ctx.role
            )));
        }
        Ok(target)
    }
}
