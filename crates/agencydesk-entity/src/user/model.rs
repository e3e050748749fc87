//! Staff account model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use agencydesk_core::AppError;

use super::role::Role;
use crate::patch::required_text;

const MAX_NAME_LEN: usize = 120;
const MAX_EMAIL_LEN: usize = 254;

/// A staff account as stored in the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Primary key.
    pub id: i64,
    /// Login email, unique case-insensitively.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Argon2id (or legacy bcrypt) password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Position in the role hierarchy.
    pub role: Role,
    /// Deactivated accounts cannot log in or refresh.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last modified.
    pub updated_at: DateTime<Utc>,
    /// Last successful login.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// The authentication-relevant view of this account.
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
            is_active: self.is_active,
        }
    }
}

/// The authenticated actor behind a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// User id.
    pub id: i64,
    /// Login email.
    pub email: String,
    /// Current role.
    pub role: Role,
    /// Whether the account is active.
    pub is_active: bool,
}

/// Data required to insert a new staff account.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login email (normalized to lowercase).
    pub email: String,
    /// Display name.
    pub name: String,
    /// Already-hashed password.
    pub password_hash: String,
    /// Assigned role.
    pub role: Role,
}

impl NewUser {
    /// Normalizes and validates the fields.
    pub fn validated(self) -> Result<Self, AppError> {
        Ok(Self {
            email: normalize_email(&self.email)?,
            name: required_text("name", &self.name, MAX_NAME_LEN)?,
            ..self
        })
    }
}

/// Partial update of a staff account. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPatch {
    /// New login email.
    #[serde(default)]
    pub email: Option<String>,
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New role.
    #[serde(default)]
    pub role: Option<Role>,
    /// Activate or deactivate the account.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UserPatch {
    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.role.is_none() && self.is_active.is_none()
    }

    /// Normalizes the set fields and rejects empty patches.
    pub fn validated(self) -> Result<Self, AppError> {
        if self.is_empty() {
            return Err(AppError::validation("Update must change at least one field"));
        }
        Ok(Self {
            email: self.email.as_deref().map(normalize_email).transpose()?,
            name: self
                .name
                .as_deref()
                .map(|n| required_text("name", n, MAX_NAME_LEN))
                .transpose()?,
            role: self.role,
            is_active: self.is_active,
        })
    }

    /// Applies the set fields to `user`.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
    }
}

/// Lowercases and sanity-checks an email address.
pub fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    let valid = email.len() <= MAX_EMAIL_LEN
        && email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(AppError::validation(format!("Invalid email address: '{email}'")));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(" A@B.com ").unwrap(), "a@b.com");
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("@b.com").is_err());
        assert!(normalize_email("a@localhost").is_err());
    }

    #[test]
    fn test_empty_patch_rejected() {
        assert!(UserPatch::default().validated().is_err());
        let patch = UserPatch {
            is_active: Some(false),
            ..UserPatch::default()
        };
        assert!(patch.validated().is_ok());
    }

    #[test]
    fn test_principal_serializes_camel_case() {
        let principal = Principal {
            id: 7,
            email: "a@b.com".into(),
            role: Role::Admin,
            is_active: true,
        };
        let json = serde_json::to_value(&principal).unwrap();
        assert_eq!(json["isActive"], true);
        assert_eq!(json["role"], "ADMIN");
    }
}
