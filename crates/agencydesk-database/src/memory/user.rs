//! In-memory user store.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use agencydesk_core::error::AppError;
use agencydesk_core::result::AppResult;
use agencydesk_core::types::pagination::{PageRequest, PageResponse};
use agencydesk_entity::user::{NewUser, User, UserPatch};

use crate::store::UserStore;

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    users: BTreeMap<i64, User>,
}

impl Inner {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email))
    }
}

/// [`UserStore`] kept in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list(&self, page: PageRequest) -> AppResult<PageResponse<User>> {
        let inner = self.inner.read().await;
        let mut users: Vec<User> = inner.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(PageResponse::from_vec(users, page))
    }

    async fn create(&self, data: &NewUser) -> AppResult<User> {
        let mut inner = self.inner.write().await;
        if inner.email_taken(&data.email, None) {
            return Err(AppError::conflict(format!(
                "Email '{}' is already registered",
                data.email
            )));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.next_id,
            email: data.email.clone(),
            name: data.name.clone(),
            password_hash: data.password_hash.clone(),
            role: data.role,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i64, patch: &UserPatch) -> AppResult<User> {
        let mut inner = self.inner.write().await;
        if let Some(email) = &patch.email {
            if inner.email_taken(email, Some(id)) {
                return Err(AppError::conflict(format!(
                    "Email '{email}' is already registered"
                )));
            }
        }

        let user = inner
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        patch.apply_to(user);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let user = inner
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(user) = self.inner.write().await.users.get_mut(&id) {
            user.last_login_at = Some(at);
        }
        Ok(())
    }

    async fn existing_ids(&self, ids: &[i64]) -> AppResult<Vec<i64>> {
        let inner = self.inner.read().await;
        let mut found: Vec<i64> = ids
            .iter()
            .copied()
            .filter(|id| inner.users.contains_key(id))
            .collect();
        found.sort_unstable();
        found.dedup();
        Ok(found)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.inner.read().await.users.len() as u64)
    }
}
