//! # agencydesk-core
//!
//! Core crate for AgencyDesk. Contains configuration schemas, the unified
//! error system, and pagination types shared by every other crate.
//!
//! This crate has **no** internal dependencies on other AgencyDesk crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
