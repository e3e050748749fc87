//! Partial update of a client record.

use serde::Deserialize;

use agencydesk_core::AppError;

use super::model::{Client, MAX_LONG_TEXT_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN};
use crate::patch::{nullable, nullable_text, required_text};

/// Client patch. `name` can only be omitted or set; every other text field
/// can also be cleared with an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub industry: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub website: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub target_audience: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub brand_voice: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

impl ClientPatch {
    /// Whether every field was omitted.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.industry.is_none()
            && self.website.is_none()
            && self.description.is_none()
            && self.target_audience.is_none()
            && self.brand_voice.is_none()
            && self.notes.is_none()
    }

    /// Normalizes the fields and rejects an empty patch.
    ///
    /// A blank string sent for a nullable field clears it.
    pub fn validated(self) -> Result<Self, AppError> {
        if self.is_empty() {
            return Err(AppError::validation("Update must change at least one field"));
        }
        Ok(Self {
            name: self
                .name
                .as_deref()
                .map(|n| required_text("name", n, MAX_NAME_LEN))
                .transpose()?,
            industry: nullable_text("industry", self.industry, MAX_SHORT_TEXT_LEN)?,
            website: nullable_text("website", self.website, MAX_SHORT_TEXT_LEN)?,
            description: nullable_text("description", self.description, MAX_LONG_TEXT_LEN)?,
            target_audience: nullable_text(
                "targetAudience",
                self.target_audience,
                MAX_LONG_TEXT_LEN,
            )?,
            brand_voice: nullable_text("brandVoice", self.brand_voice, MAX_LONG_TEXT_LEN)?,
            notes: nullable_text("notes", self.notes, MAX_LONG_TEXT_LEN)?,
        })
    }

    /// Applies the patch to `client` in place.
    pub fn apply_to(&self, client: &mut Client) {
        if let Some(name) = &self.name {
            client.name = name.clone();
        }
        apply(&mut client.industry, &self.industry);
        apply(&mut client.website, &self.website);
        apply(&mut client.description, &self.description);
        apply(&mut client.target_audience, &self.target_audience);
        apply(&mut client.brand_voice, &self.brand_voice);
        apply(&mut client.notes, &self.notes);
    }
}

fn apply(slot: &mut Option<String>, change: &Option<Option<String>>) {
    if let Some(value) = change {
        *slot = value.clone();
    }
}
