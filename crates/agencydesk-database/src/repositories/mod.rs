//! PostgreSQL implementations of the store traits.

pub mod client;
pub mod user;

pub use client::ClientRepository;
pub use user::UserRepository;

use agencydesk_core::error::{AppError, ErrorKind};

/// Wrap a sqlx error as a database error with context.
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}
