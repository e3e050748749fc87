//! # agencydesk-auth
//!
//! The session/token authority: everything needed to turn credentials into
//! signed tokens and signed tokens back into an authenticated principal.
//!
//! ## Modules
//!
//! - `jwt`: access/refresh token issuing and verification
//! - `password`: Argon2id hashing (with legacy bcrypt verification) and policy
//! - `rbac`: role hierarchy checks
//! - `session`: login/refresh flows and the per-request session state machine
//!
//! Nothing here holds mutable state; every type is cheap to clone and is
//! shared across requests behind an `Arc`.

pub mod error;
pub mod jwt;
pub mod password;
pub mod rbac;
pub mod session;

pub use error::AuthError;
pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenKind, TokenPair};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{has_permission, require_role};
pub use session::{LoginOutcome, SessionAuthority, SessionResolver, SessionState};
