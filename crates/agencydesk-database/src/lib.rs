//! # agencydesk-database
//!
//! PostgreSQL connection management, the [`UserStore`] / [`ClientStore`]
//! traits consumed by the session authority and services, and two
//! implementations of each: sqlx-backed repositories and in-memory stores
//! used by tests and demo mode.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::{MemoryClientStore, MemoryUserStore};
pub use repositories::{ClientRepository, UserRepository};
pub use store::{ClientStore, UserStore};
