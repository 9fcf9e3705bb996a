//! Error types for the storefront client.
//!
//! One unified error type with explicit variants for transport,
//! authorization, protocol, and input validation failures. Every type here
//! is `Clone`: a single refresh failure is handed to every request that was
//! waiting on it.

use std::fmt;
use thiserror::Error;

/// The unified error type for storefront operations.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authorization errors (rejected credentials, failed refresh).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Any non-success status other than an intercepted 401.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Input validation errors (invalid URL, method, argument).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// True for every authorization failure, whether the retried request was
    /// refused again or the refresh itself failed.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Auth(_))
    }

    /// True when no status code was obtained from the server.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Protocol(err) => Some(err.status),
            Error::Auth(AuthError::RefreshRejected { status, .. }) => Some(*status),
            Error::Auth(AuthError::Unauthorized { .. } | AuthError::InvalidCredentials) => {
                Some(401)
            }
            _ => None,
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// DNS resolution failed.
    #[error("DNS resolution failed: {host}")]
    Dns { host: String },

    /// TLS/SSL error.
    #[error("TLS error: {message}")]
    Tls { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authorization-related errors.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The login endpoint refused the username/password pair.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The request was refused again after its single refresh-and-retry.
    #[error("unauthorized: {method} {path}")]
    Unauthorized { method: String, path: String },

    /// The refresh endpoint answered with a non-success status.
    #[error("refresh rejected with HTTP {status}{}", message_suffix(.message))]
    RefreshRejected {
        status: u16,
        message: Option<String>,
    },

    /// The refresh call did not settle within the configured bound.
    #[error("refresh timed out after {duration_ms}ms")]
    RefreshTimedOut { duration_ms: u64 },

    /// The refresh call failed on the wire or returned an unreadable body.
    #[error("refresh failed: {source}")]
    RefreshFailed { source: Box<Error> },

    /// A login, restore or logout replaced the session while the refresh ran,
    /// so its credential was discarded.
    #[error("session changed during refresh")]
    RefreshSuperseded,

    /// The refresh wave ended without delivering an outcome.
    #[error("refresh abandoned before it settled")]
    RefreshAbandoned,
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

/// Protocol-level errors: a response status the client does not intercept.
#[derive(Debug, Clone)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Error code from the response body (if present).
    pub error: Option<String>,
    /// Error message from the server.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }

    /// A validation failure (4xx).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// A server failure (5xx).
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// Input validation errors.
#[derive(Debug, Clone, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Unknown HTTP method.
    #[error("invalid HTTP method '{value}'")]
    Method { value: String },

    /// A header name or value that cannot be sent.
    #[error("invalid header '{name}': {reason}")]
    Header { name: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
