//! In-memory client store.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use agencydesk_core::error::AppError;
use agencydesk_core::result::AppResult;
use agencydesk_core::types::pagination::{PageRequest, PageResponse};
use agencydesk_entity::client::{Client, ClientFilter, ClientPatch, NewClient};

use crate::store::ClientStore;

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    clients: BTreeMap<i64, Client>,
}

/// [`ClientStore`] kept in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryClientStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify(&self, id: i64, f: impl FnOnce(&mut Client)) -> AppResult<Client> {
        let mut inner = self.inner.write().await;
        let client = inner
            .clients
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Client {id} not found")))?;
        f(client);
        client.updated_at = Utc::now();
        Ok(client.clone())
    }
}

#[async_trait]
impl ClientStore for MemoryClientStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Client>> {
        Ok(self.inner.read().await.clients.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: ClientFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Client>> {
        let inner = self.inner.read().await;
        let mut clients: Vec<Client> = inner
            .clients
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        clients.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        Ok(PageResponse::from_vec(clients, page))
    }

    async fn create(&self, data: &NewClient, created_by: i64) -> AppResult<Client> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let now = Utc::now();
        let client = Client {
            id: inner.next_id,
            name: data.name.clone(),
            industry: data.industry.clone(),
            website: data.website.clone(),
            description: data.description.clone(),
            target_audience: data.target_audience.clone(),
            brand_voice: data.brand_voice.clone(),
            notes: data.notes.clone(),
            assigned_user_ids: data.assigned_user_ids.clone(),
            is_archived: false,
            archived_at: None,
            created_by,
            created_at: now,
            updated_at: now,
        };
        inner.clients.insert(client.id, client.clone());
        Ok(client)
    }

    async fn update(&self, id: i64, patch: &ClientPatch) -> AppResult<Client> {
        self.modify(id, |client| patch.apply_to(client)).await
    }

    async fn set_assignees(&self, id: i64, user_ids: &[i64]) -> AppResult<Client> {
        self.modify(id, |client| client.assigned_user_ids = user_ids.to_vec())
            .await
    }

    async fn set_archived(&self, id: i64, archived: bool) -> AppResult<Client> {
        self.modify(id, |client| {
            client.is_archived = archived;
            client.archived_at = archived.then(Utc::now);
        })
        .await
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.inner.write().await.clients.remove(&id).is_some())
    }
}
