//! First-account bootstrap.
//!
//! Set through `AGENCYDESK__BOOTSTRAP__ADMIN_EMAIL` and
//! `AGENCYDESK__BOOTSTRAP__ADMIN_PASSWORD`. The account is only created
//! when the user store is empty, which makes in-memory demo mode usable.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Login email of the SUPER_ADMIN to create.
    #[serde(default)]
    pub admin_email: Option<String>,
    #[serde(default = "default_admin_name")]
    pub admin_name: String,
    /// Plaintext password; checked against the password policy before use.
    #[serde(default)]
    pub admin_password: Option<String>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            admin_email: None,
            admin_name: default_admin_name(),
            admin_password: None,
        }
    }
}

impl BootstrapConfig {
    /// Email and password, when both are set and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let email = self.admin_email.as_deref().map(str::trim).filter(|e| !e.is_empty())?;
        let password = self.admin_password.as_deref().filter(|p| !p.is_empty())?;
        Some((email, password))
    }
}

impl fmt::Debug for BootstrapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapConfig")
            .field("admin_email", &self.admin_email)
            .field("admin_name", &self.admin_name)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

fn default_admin_name() -> String {
    "Administrator".to_string()
}
