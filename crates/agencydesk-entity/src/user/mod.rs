//! Staff accounts, the principal view of them, and the role hierarchy.

pub mod model;
pub mod role;

pub use model::{NewUser, Principal, User, UserPatch};
pub use role::Role;
