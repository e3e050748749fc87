//! User repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use agencydesk_core::error::AppError;
use agencydesk_core::result::AppResult;
use agencydesk_core::types::pagination::{PageRequest, PageResponse};
use agencydesk_entity::user::{NewUser, User, UserPatch};

use super::db_error;
use crate::store::UserStore;

const EMAIL_UNIQUE_INDEX: &str = "users_email_lower_key";

/// PostgreSQL-backed [`UserStore`].
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn email_conflict(email: &str) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |e| match e {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(EMAIL_UNIQUE_INDEX) => {
            AppError::conflict(format!("Email '{email}' is already registered"))
        }
        other => db_error("Failed to write user")(other),
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by id"))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by email"))
    }

    async fn list(&self, page: PageRequest) -> AppResult<PageResponse<User>> {
        let total = self.count().await?;

        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list users"))?;

        Ok(PageResponse::new(users, page, total))
    }

    async fn create(&self, data: &NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, name, password_hash, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(&data.email)
        .bind(&data.name)
        .bind(&data.password_hash)
        .bind(data.role)
        .fetch_one(&self.pool)
        .await
        .map_err(email_conflict(&data.email))
    }

    async fn update(&self, id: i64, patch: &UserPatch) -> AppResult<User> {
        let email = patch.email.as_deref().unwrap_or_default();
        sqlx::query_as::<_, User>(
            "UPDATE users SET \
                email = COALESCE($2, email), \
                name = COALESCE($3, name), \
                role = COALESCE($4, role), \
                is_active = COALESCE($5, is_active), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(id)
        .bind(patch.email.as_deref())
        .bind(patch.name.as_deref())
        .bind(patch.role)
        .bind(patch.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(email_conflict(email))?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(&self.pool)
                .await
                .map_err(db_error("Failed to update password"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        Ok(())
    }

    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_login_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to record login"))?;
        Ok(())
    }

    async fn existing_ids(&self, ids: &[i64]) -> AppResult<Vec<i64>> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = ANY($1) ORDER BY id")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to resolve user ids"))
    }

    async fn count(&self) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count users"))?;
        Ok(total as u64)
    }
}
