//! Client repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use agencydesk_core::error::AppError;
use agencydesk_core::result::AppResult;
use agencydesk_core::types::pagination::{PageRequest, PageResponse};
use agencydesk_entity::client::{Client, ClientFilter, ClientPatch, NewClient};

use super::db_error;
use crate::store::ClientStore;

const FILTER_CLAUSE: &str = "($1 OR NOT is_archived) \
     AND ($2::BIGINT IS NULL OR $2 = ANY(assigned_user_ids))";

/// PostgreSQL-backed [`ClientStore`].
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn not_found(id: i64) -> AppError {
    AppError::not_found(format!("Client {id} not found"))
}

/// Split a tri-state patch field into (`is_set`, value) bind parameters.
fn tri_state(field: &Option<Option<String>>) -> (bool, Option<&str>) {
    match field {
        None => (false, None),
        Some(value) => (true, value.as_deref()),
    }
}

#[async_trait]
impl ClientStore for ClientRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Client>> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find client by id"))
    }

    async fn list(
        &self,
        filter: ClientFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Client>> {
        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM clients WHERE {FILTER_CLAUSE}"))
                .bind(filter.include_archived)
                .bind(filter.assigned_to)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count clients"))?;

        let clients = sqlx::query_as::<_, Client>(&format!(
            "SELECT * FROM clients WHERE {FILTER_CLAUSE} \
             ORDER BY LOWER(name), id LIMIT $3 OFFSET $4"
        ))
        .bind(filter.include_archived)
        .bind(filter.assigned_to)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list clients"))?;

        Ok(PageResponse::new(clients, page, total as u64))
    }

    async fn create(&self, data: &NewClient, created_by: i64) -> AppResult<Client> {
        sqlx::query_as::<_, Client>(
            "INSERT INTO clients \
                (name, industry, website, description, target_audience, brand_voice, notes, \
                 assigned_user_ids, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING *",
        )
        .bind(&data.name)
        .bind(data.industry.as_deref())
        .bind(data.website.as_deref())
        .bind(data.description.as_deref())
        .bind(data.target_audience.as_deref())
        .bind(data.brand_voice.as_deref())
        .bind(data.notes.as_deref())
        .bind(&data.assigned_user_ids)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create client"))
    }

    async fn update(&self, id: i64, patch: &ClientPatch) -> AppResult<Client> {
        let (set_industry, industry) = tri_state(&patch.industry);
        let (set_website, website) = tri_state(&patch.website);
        let (set_description, description) = tri_state(&patch.description);
        let (set_audience, audience) = tri_state(&patch.target_audience);
        let (set_voice, voice) = tri_state(&patch.brand_voice);
        let (set_notes, notes) = tri_state(&patch.notes);

        sqlx::query_as::<_, Client>(
            "UPDATE clients SET \
                name = COALESCE($2, name), \
                industry = CASE WHEN $3 THEN $4 ELSE industry END, \
                website = CASE WHEN $5 THEN $6 ELSE website END, \
                description = CASE WHEN $7 THEN $8 ELSE description END, \
                target_audience = CASE WHEN $9 THEN $10 ELSE target_audience END, \
                brand_voice = CASE WHEN $11 THEN $12 ELSE brand_voice END, \
                notes = CASE WHEN $13 THEN $14 ELSE notes END, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(set_industry)
        .bind(industry)
        .bind(set_website)
        .bind(website)
        .bind(set_description)
        .bind(description)
        .bind(set_audience)
        .bind(audience)
        .bind(set_voice)
        .bind(voice)
        .bind(set_notes)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update client"))?
        .ok_or_else(|| not_found(id))
    }

    async fn set_assignees(&self, id: i64, user_ids: &[i64]) -> AppResult<Client> {
        sqlx::query_as::<_, Client>(
            "UPDATE clients SET assigned_user_ids = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(user_ids)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to assign staff"))?
        .ok_or_else(|| not_found(id))
    }

    async fn set_archived(&self, id: i64, archived: bool) -> AppResult<Client> {
        sqlx::query_as::<_, Client>(
            "UPDATE clients SET \
                is_archived = $2, \
                archived_at = CASE WHEN $2 THEN NOW() ELSE NULL END, \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(archived)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to change archive state"))?
        .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete client"))?;
        Ok(result.rows_affected() > 0)
    }
}
