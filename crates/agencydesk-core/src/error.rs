//! Application error type shared by every AgencyDesk crate.
//!
//! Store, auth and service code all return [`AppError`] so handlers can use
//! `?` end to end. The API layer decides the HTTP status from [`ErrorKind`].

use std::fmt;

use thiserror::Error;

/// Coarse error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Bad input: malformed body, failed field checks, weak password.
    Validation,
    /// No usable session or wrong credentials.
    Unauthorized,
    /// Authenticated, but the role or client assignment does not allow it.
    Forbidden,
    NotFound,
    /// Duplicate email or an illegal archive/delete transition.
    Conflict,
    Database,
    Configuration,
    /// A dependency (the database) cannot be reached right now.
    ServiceUnavailable,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::Database => "DATABASE",
            Self::Configuration => "CONFIGURATION",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::Internal => "INTERNAL",
        }
    }

    /// Whether the message may contain server internals and must not be
    /// shown to callers.
    pub fn is_internal(self) -> bool {
        matches!(self, Self::Database | Self::Configuration | Self::Internal)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error carried through every layer of AgencyDesk.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    /// Underlying cause, kept for logging only.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Message safe to return to an HTTP caller.
    pub fn public_message(&self) -> &str {
        if self.kind.is_internal() {
            "Internal server error"
        } else {
            &self.message
        }
    }
}

// The boxed source is not `Clone`; clones keep kind and message only.
impl Clone for AppError {
    fn clone(&self) -> Self {
        Self::new(self.kind, self.message.clone())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Invalid configuration: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = AppError::conflict("Client must be archived before deletion");
        assert_eq!(
            err.to_string(),
            "CONFLICT: Client must be archived before deletion"
        );
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::other("disk");
        let err = AppError::with_source(ErrorKind::Internal, "wrapped", io);
        assert!(err.source.is_some());
        let cloned = err.clone();
        assert_eq!(cloned.kind, ErrorKind::Internal);
        assert!(cloned.source.is_none());
    }

    #[test]
    fn test_public_message_hides_internals() {
        let err = AppError::database("relation \"clients\" does not exist");
        assert_eq!(err.public_message(), "Internal server error");

        let err = AppError::new(ErrorKind::ServiceUnavailable, "Database unreachable");
        assert_eq!(err.public_message(), "Database unreachable");

        let err = AppError::forbidden("You are not assigned to this client");
        assert_eq!(err.public_message(), "You are not assigned to this client");
    }
}
