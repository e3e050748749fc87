//! Staff account services.

pub mod admin;
pub mod service;

pub use admin::{AdminUserService, CreateUserRequest};
pub use service::UserService;
