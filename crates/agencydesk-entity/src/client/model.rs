//! Client (brand profile) model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use agencydesk_core::AppError;

use crate::patch::{optional_text, required_text};

pub(crate) const MAX_NAME_LEN: usize = 200;
pub(crate) const MAX_SHORT_TEXT_LEN: usize = 500;
pub(crate) const MAX_LONG_TEXT_LEN: usize = 10_000;

/// A client brand profile managed by the agency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Primary key.
    pub id: i64,
    /// Brand name.
    pub name: String,
    /// Industry or vertical.
    pub industry: Option<String>,
    /// Public website.
    pub website: Option<String>,
    /// Free-form brand description.
    pub description: Option<String>,
    /// Who the brand speaks to.
    pub target_audience: Option<String>,
    /// Tone and voice guidelines.
    pub brand_voice: Option<String>,
    /// Internal notes.
    pub notes: Option<String>,
    /// Staff assigned to this client.
    pub assigned_user_ids: Vec<i64>,
    /// Archived clients are hidden from default listings.
    pub is_archived: bool,
    /// When the client was archived.
    pub archived_at: Option<DateTime<Utc>>,
    /// User who created the record.
    pub created_by: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Whether `user_id` is assigned to this client.
    pub fn is_assigned(&self, user_id: i64) -> bool {
        self.assigned_user_ids.contains(&user_id)
    }
}

/// Data required to insert a new client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub brand_voice: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub assigned_user_ids: Vec<i64>,
}

impl NewClient {
    /// Trims text fields, drops blank optionals and deduplicates assignees.
    pub fn validated(self) -> Result<Self, AppError> {
        Ok(Self {
            name: required_text("name", &self.name, MAX_NAME_LEN)?,
            industry: optional_text("industry", self.industry.as_deref(), MAX_SHORT_TEXT_LEN)?,
            website: optional_text("website", self.website.as_deref(), MAX_SHORT_TEXT_LEN)?,
            description: optional_text(
                "description",
                self.description.as_deref(),
                MAX_LONG_TEXT_LEN,
            )?,
            target_audience: optional_text(
                "targetAudience",
                self.target_audience.as_deref(),
                MAX_LONG_TEXT_LEN,
            )?,
            brand_voice: optional_text("brandVoice", self.brand_voice.as_deref(), MAX_LONG_TEXT_LEN)?,
            notes: optional_text("notes", self.notes.as_deref(), MAX_LONG_TEXT_LEN)?,
            assigned_user_ids: dedup_ids(self.assigned_user_ids),
        })
    }
}

/// Listing filter for clients.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientFilter {
    /// Include archived clients.
    pub include_archived: bool,
    /// Restrict to clients assigned to this user.
    pub assigned_to: Option<i64>,
}

impl ClientFilter {
    /// Whether `client` passes this filter.
    pub fn matches(&self, client: &Client) -> bool {
        (self.include_archived || !client.is_archived)
            && self.assigned_to.is_none_or(|id| client.is_assigned(id))
    }
}

/// Sorts and deduplicates a list of user ids.
pub fn dedup_ids(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids.dedup();
    ids
}
