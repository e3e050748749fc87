//! Session flows: login, refresh, and per-request resolution.

pub mod authority;
pub mod resolver;

pub use authority::{LoginOutcome, SessionAuthority};
pub use resolver::{SessionResolver, SessionState};
