//! # agencydesk-entity
//!
//! Domain entity models for AgencyDesk. Every struct in this crate is either
//! a database row (deriving `sqlx::FromRow`) or a value object that flows
//! between the stores, the session authority, and the HTTP layer.

pub mod client;
pub mod patch;
pub mod user;
