//! # agencydesk-service
//!
//! Business logic for AgencyDesk. Services receive a [`RequestContext`]
//! describing the authenticated actor, enforce the role rules for the
//! operation, and delegate persistence to the store traits.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references.

pub mod client;
pub mod context;
pub mod user;

pub use client::ClientService;
pub use context::RequestContext;
pub use user::{AdminUserService, CreateUserRequest, UserService};
