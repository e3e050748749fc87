//! Request DTOs with validation.

use serde::Deserialize;
use validator::Validate;

use agencydesk_entity::user::Role;
use agencydesk_service::CreateUserRequest;

/// Login request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

/// Token refresh request body. When absent the `refresh-token` cookie is used.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Self-service password change.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub current_password: String,
    #[validate(length(min = 1, max = 128, message = "must be 1-128 characters"))]
    pub new_password: String,
}

/// Replacement assignee list for a client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssigneesRequest {
    pub user_ids: Vec<i64>,
}

/// Admin creation of a staff account.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserBody {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 120, message = "must be 1-120 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 128, message = "must be 1-128 characters"))]
    pub password: String,
    pub role: Role,
}

impl From<CreateUserBody> for CreateUserRequest {
    fn from(body: CreateUserBody) -> Self {
        Self {
            email: body.email,
            name: body.name,
            password: body.password,
            role: body.role,
        }
    }
}

/// Admin password reset.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, max = 128, message = "must be 1-128 characters"))]
    pub password: String,
}
