//! In-memory store implementations.
//!
//! Backed by `tokio::sync::RwLock` maps and sequential ids. Used by the
//! integration tests and by demo mode (`database.in_memory = true`);
//! everything is lost on restart.

pub mod client;
pub mod user;

pub use client::MemoryClientStore;
pub use user::MemoryUserStore;
