//! Storage traits consumed by the session authority and the services.
//!
//! Both traits are object safe and are shared as `Arc<dyn ...>` so the
//! PostgreSQL repositories and the in-memory stores are interchangeable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use agencydesk_core::result::AppResult;
use agencydesk_core::types::pagination::{PageRequest, PageResponse};
use agencydesk_entity::client::{Client, ClientFilter, ClientPatch, NewClient};
use agencydesk_entity::user::{NewUser, User, UserPatch};

/// Staff account storage.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Find a user by email, case-insensitively.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List users, newest first.
    async fn list(&self, page: PageRequest) -> AppResult<PageResponse<User>>;

    /// Insert a user. A duplicate email is a `Conflict`.
    async fn create(&self, data: &NewUser) -> AppResult<User>;

    /// Apply a validated patch. Missing user is `NotFound`.
    async fn update(&self, id: i64, patch: &UserPatch) -> AppResult<User>;

    /// Replace the stored password hash.
    async fn update_password(&self, id: i64, password_hash: &str) -> AppResult<()>;

    /// Record a successful login.
    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> AppResult<()>;

    /// Return the subset of `ids` that exist, sorted ascending.
    async fn existing_ids(&self, ids: &[i64]) -> AppResult<Vec<i64>>;

    /// Total number of users.
    async fn count(&self) -> AppResult<u64>;
}

/// Client record storage.
#[async_trait]
pub trait ClientStore: Send + Sync + 'static {
    /// Find a client by primary key.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Client>>;

    /// List clients matching `filter`, ordered by name.
    async fn list(&self, filter: ClientFilter, page: PageRequest)
    -> AppResult<PageResponse<Client>>;

    /// Insert a validated client.
    async fn create(&self, data: &NewClient, created_by: i64) -> AppResult<Client>;

    /// Apply a validated patch. Missing client is `NotFound`.
    async fn update(&self, id: i64, patch: &ClientPatch) -> AppResult<Client>;

    /// Replace the assigned staff list.
    async fn set_assignees(&self, id: i64, user_ids: &[i64]) -> AppResult<Client>;

    /// Archive or unarchive; `archived_at` follows the flag.
    async fn set_archived(&self, id: i64, archived: bool) -> AppResult<Client>;

    /// Delete a client. Returns `false` if it did not exist.
    async fn delete(&self, id: i64) -> AppResult<bool>;
}
