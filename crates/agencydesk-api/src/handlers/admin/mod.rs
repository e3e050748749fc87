//! Administration handlers (ADMIN and above).

pub mod users;
