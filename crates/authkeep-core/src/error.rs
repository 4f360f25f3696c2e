//! Error types for authkeep.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, protocol, storage and input validation errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for authkeep operations.
///
/// Every store action resolves to `Ok` or to one of these variants; callers
/// can match on them to tell a rejected login from a dead network.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, HTTP).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (rejected login, rejected registration).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Protocol errors (unexpected or undecodable responses).
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Persisted storage errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation errors (invalid API URL, storage key).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint answered with something other than 200.
    #[error("login failure {status}")]
    LoginRejected { status: u16 },

    /// The token endpoint answered 200 without an access token.
    #[error("login response did not contain an access token")]
    MissingAccessToken,

    /// Another login is still waiting for its response.
    #[error("a login is already in progress")]
    LoginInProgress,

    /// The register endpoint rejected the registration.
    #[error("registration failure {status}{}", detail_suffix(.detail))]
    RegistrationRejected { status: u16, detail: Option<String> },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}

/// Protocol-level errors from the API.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Error message describing what was wrong with the response.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }
}

/// Persisted storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store could not be read or written.
    #[error("IO error on '{key}': {message}")]
    Io { key: String, message: String },

    /// A stored session exists but cannot be decoded.
    #[error("malformed stored session under '{key}': {reason}")]
    MalformedStoredSession { key: String, reason: String },

    /// The session could not be serialized for storage.
    #[error("failed to encode session: {message}")]
    Encode { message: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Invalid storage key.
    #[error("invalid storage key '{value}': {reason}")]
    StorageKey { value: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_rejection_mentions_status() {
        let err: Error = AuthError::LoginRejected { status: 401 }.into();
        assert_eq!(err.to_string(), "authentication error: login failure 401");
    }

    #[test]
    fn registration_rejection_includes_detail() {
        let err = AuthError::RegistrationRejected {
            status: 409,
            detail: Some("Username already registered".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "registration failure 409: Username already registered"
        );

        let bare = AuthError::RegistrationRejected {
            status: 500,
            detail: None,
        };
        assert_eq!(bare.to_string(), "registration failure 500");
    }

    #[test]
    fn transport_errors_display() {
        let err: Error = TransportError::Timeout { duration_ms: 100 }.into();
        assert_eq!(err.to_string(), "transport error: request timed out after 100ms");

        let err = TransportError::Connection {
            message: "refused".to_string(),
        };
        assert_eq!(err.to_string(), "connection failed: refused");
    }

    #[test]
    fn protocol_error_display() {
        let err = ProtocolError::new(200, Some("expected value".to_string()));
        assert_eq!(err.to_string(), "HTTP 200: expected value");
        assert_eq!(ProtocolError::new(502, None).to_string(), "HTTP 502");
    }
}
