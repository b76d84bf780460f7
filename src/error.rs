use serde_json::Value;
use thiserror::Error;

/// The client's error type.
#[derive(Error, Debug)]
pub enum ClientError {
    /// A client-side validation error. Never reaches the network.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An authentication error (HTTP 401 or rejected credentials).
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Human-readable message extracted from the response body.
        message: String,
        /// The parsed response body, when parseable.
        data: Option<Value>,
    },

    /// A conflict reported by the API, e.g. an email that is already registered.
    #[error("Conflict: {message}")]
    Conflict {
        /// Human-readable message extracted from the response body.
        message: String,
        /// The parsed response body, when parseable. Carries field-level
        /// detail such as which field the conflict is on.
        data: Option<Value>,
    },

    /// Credentials rejected at persist time (token missing, undecodable, or
    /// missing its expiry/subject claims).
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// A success response whose body does not match the expected shape.
    #[error("Invalid response from server")]
    InvalidResponse,

    /// A non-2xx API response that is not a 401 or a conflict.
    #[error("API error ({status}): {message}")]
    Api {
        /// Human-readable message extracted from the response body.
        message: String,
        /// The HTTP status code.
        status: u16,
        /// The parsed response body, when parseable.
        data: Option<Value>,
    },

    /// A transport failure: no response was received.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A locally detected expired session (expiry claim in the past).
    #[error("Session expired")]
    ExpiredSession,

    /// A storage tier error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An internal client error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `ClientError` as the error type.
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Returns the HTTP status code associated with this error, when one exists.
    ///
    /// Network failures and locally detected errors carry no status.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Authentication { .. } => Some(401),
            ClientError::Conflict { .. } => Some(409),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the parsed response body attached to this error, when one exists.
    pub fn data(&self) -> Option<&Value> {
        match self {
            ClientError::Authentication { data, .. }
            | ClientError::Conflict { data, .. }
            | ClientError::Api { data, .. } => data.as_ref(),
            _ => None,
        }
    }

    /// Whether this error should be treated as "the session is no longer valid":
    /// the caller clears credentials and returns to the login screen.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ClientError::Authentication { .. } | ClientError::ExpiredSession
        )
    }
}
