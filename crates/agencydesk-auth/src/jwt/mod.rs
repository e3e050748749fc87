//! Token issuing and verification.
//!
//! Access tokens are signed with `JWT_SECRET`, refresh tokens with
//! `JWT_REFRESH_SECRET`. Because the keys differ, a token presented as the
//! wrong kind fails signature verification.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::{Claims, TokenKind};
pub use decoder::JwtDecoder;
pub use encoder::{JwtEncoder, TokenPair};
