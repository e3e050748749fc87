//! Staff role hierarchy.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use agencydesk_core::AppError;

/// Staff roles, totally ordered: `Smm < Admin < SuperAdmin`.
///
/// [`Role::rank`] is the single source of the ordering; `Ord` and
/// [`Role::has_at_least`] are both derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Social media manager. Works on the clients assigned to them.
    Smm,
    /// Agency administrator. Manages all clients and SMM accounts.
    Admin,
    /// Owner-level administrator. May manage admins and delete clients.
    SuperAdmin,
}

impl Role {
    /// Every role, lowest rank first.
    pub const ALL: [Role; 3] = [Role::Smm, Role::Admin, Role::SuperAdmin];

    /// Integer rank: SMM = 1, ADMIN = 2, SUPER_ADMIN = 3.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Smm => 1,
            Self::Admin => 2,
            Self::SuperAdmin => 3,
        }
    }

    /// True iff this role ranks at or above `required`.
    pub fn has_at_least(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Wire spelling of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smm => "SMM",
            Self::Admin => "ADMIN",
            Self::SuperAdmin => "SUPER_ADMIN",
        }
    }
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Role {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "SMM" => Ok(Self::Smm),
            "ADMIN" => Ok(Self::Admin),
            "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            _ => Err(AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: SMM, ADMIN, SUPER_ADMIN"
            ))),
        }
    }
}
