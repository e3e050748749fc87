//! Core type definitions used across the AgencyDesk workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
