//! # ClientError
//!
//! Centralized error handling for every outbound operation of the client.
//! Each variant is a structured failure the presentation layer can render as-is.

use thiserror::Error;

/// The primary error type for all client operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// No session is present where one is required. Raised before any network call.
    #[error("missing identity: no authenticated user")]
    MissingIdentity,

    /// The server rejected the credentials (HTTP 401). On authenticated calls the session
    /// has already been cleared; public calls (register, verify, resend) leave it alone.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found (e.g., unknown user or favorite)
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success response.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Login answered with `success: false`.
    #[error("login rejected: {0}")]
    LoginRejected(String),

    /// The request never produced a response (DNS, TLS, connection reset...)
    #[error("transport failure: {0}")]
    Transport(String),

    /// A request body could not be encoded.
    #[error("invalid request payload: {0}")]
    InvalidRequest(String),

    /// A response arrived but its body did not have the expected shape.
    #[error("invalid response payload: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// True for the 401 family, which always implies the session was invalidated.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }
}

/// A specialized Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
