//! Client record management.

use std::sync::Arc;

use tracing::info;

use agencydesk_core::error::AppError;
use agencydesk_core::types::pagination::{PageRequest, PageResponse};
use agencydesk_database::store::{ClientStore, UserStore};
use agencydesk_entity::client::{Client, ClientFilter, ClientPatch, NewClient, dedup_ids};
use agencydesk_entity::user::Role;

use crate::context::RequestContext;

/// Client CRUD, staff assignment, and the archive-then-delete lifecycle.
///
/// SMMs see and edit only clients they are assigned to; admins act on all
/// clients. Deletion is reserved for super admins and only applies to
/// archived clients.
#[derive(Clone)]
pub struct ClientService {
    clients: Arc<dyn ClientStore>,
    users: Arc<dyn UserStore>,
}

impl std::fmt::Debug for ClientService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientService").finish_non_exhaustive()
    }
}

impl ClientService {
    pub fn new(clients: Arc<dyn ClientStore>, users: Arc<dyn UserStore>) -> Self {
        Self { clients, users }
    }

    /// Lists the clients visible to the actor.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        include_archived: bool,
        page: PageRequest,
    ) -> Result<PageResponse<Client>, AppError> {
        let filter = ClientFilter {
            include_archived,
            assigned_to: (!ctx.is_admin_or_above()).then_some(ctx.user_id),
        };
        self.clients.list(filter, page).await
    }

    /// Fetches one client the actor is allowed to see.
    pub async fn get(&self, ctx: &RequestContext, client_id: i64) -> Result<Client, AppError> {
        let client = self.load(client_id).await?;
        ensure_visible(ctx, &client)?;
        Ok(client)
    }

    /// Creates a client.
    ///
    /// An SMM always ends up as the sole assignee of a client they create;
    /// admins may assign any existing staff.
    pub async fn create(&self, ctx: &RequestContext, data: NewClient) -> Result<Client, AppError> {
        let mut data = data.validated()?;

        if ctx.is_admin_or_above() {
            self.ensure_users_exist(&data.assigned_user_ids).await?;
        } else {
            data.assigned_user_ids = vec![ctx.user_id];
        }

        let client = self.clients.create(&data, ctx.user_id).await?;
        info!(
            user_id = %ctx.user_id,
            client_id = %client.id,
            name = %client.name,
            "Client created"
        );
        Ok(client)
    }

    /// Applies a partial update. Archived clients are read-only.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        client_id: i64,
        patch: ClientPatch,
    ) -> Result<Client, AppError> {
        let patch = patch.validated()?;
        let client = self.get(ctx, client_id).await?;
        if client.is_archived {
            return Err(AppError::conflict(
                "Archived clients cannot be edited; unarchive first",
            ));
        }

        let updated = self.clients.update(client_id, &patch).await?;
        info!(user_id = %ctx.user_id, client_id = %client_id, "Client updated");
        Ok(updated)
    }

    /// Replaces the assigned staff list (ADMIN+).
    pub async fn set_assignees(
        &self,
        ctx: &RequestContext,
        client_id: i64,
        user_ids: Vec<i64>,
    ) -> Result<Client, AppError> {
        ctx.require_role(Role::Admin)?;
        let user_ids = dedup_ids(user_ids);
        self.load(client_id).await?;
        self.ensure_users_exist(&user_ids).await?;

        let client = self.clients.set_assignees(client_id, &user_ids).await?;
        info!(
            user_id = %ctx.user_id,
            client_id = %client_id,
            assignees = ?client.assigned_user_ids,
            "Client staff assignment changed"
        );
        Ok(client)
    }

    /// Archives a client (ADMIN+).
    pub async fn archive(&self, ctx: &RequestContext, client_id: i64) -> Result<Client, AppError> {
        self.set_archived(ctx, client_id, true).await
    }

    /// Restores an archived client (ADMIN+).
    pub async fn unarchive(&self, ctx: &RequestContext, client_id: i64) -> Result<Client, AppError> {
        self.set_archived(ctx, client_id, false).await
    }

    async fn set_archived(
        &self,
        ctx: &RequestContext,
        client_id: i64,
        archived: bool,
    ) -> Result<Client, AppError> {
        ctx.require_role(Role::Admin)?;
        let client = self.load(client_id).await?;
        if client.is_archived == archived {
            let state = if archived { "already archived" } else { "not archived" };
            return Err(AppError::conflict(format!("Client {client_id} is {state}")));
        }

        let client = self.clients.set_archived(client_id, archived).await?;
        info!(
            user_id = %ctx.user_id,
            client_id = %client_id,
            archived,
            "Client archive state changed"
        );
        Ok(client)
    }

    /// Permanently deletes an archived client (SUPER_ADMIN).
    pub async fn delete(&self, ctx: &RequestContext, client_id: i64) -> Result<(), AppError> {
        ctx.require_role(Role::SuperAdmin)?;
        let client = self.load(client_id).await?;
        if !client.is_archived {
            return Err(AppError::conflict(
                "Client must be archived before it can be deleted",
            ));
        }

        if !self.clients.delete(client_id).await? {
            return Err(AppError::not_found(format!("Client {client_id} not found")));
        }
        info!(user_id = %ctx.user_id, client_id = %client_id, "Client deleted");
        Ok(())
    }

    async fn load(&self, client_id: i64) -> Result<Client, AppError> {
        self.clients
            .find_by_id(client_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Client {client_id} not found")))
    }

    async fn ensure_users_exist(&self, user_ids: &[i64]) -> Result<(), AppError> {
        if user_ids.is_empty() {
            return Ok(());
        }
        let found = self.users.existing_ids(user_ids).await?;
        let missing: Vec<i64> = user_ids
            .iter()
            .copied()
            .filter(|id| !found.contains(id))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::validation(format!(
                "Unknown staff user ids: {missing:?}"
            )));
        }
        Ok(())
    }
}

fn ensure_visible(ctx: &RequestContext, client: &Client) -> Result<(), AppError> {
    if ctx.is_admin_or_above() || client.is_assigned(ctx.user_id) {
        Ok(())
    } else {
        Err(AppError::forbidden("You are not assigned to this client"))
    }
}
