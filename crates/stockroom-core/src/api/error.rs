use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Message shown whenever no HTTP response reached the client.
pub const UNREACHABLE_MESSAGE: &str =
    "Server is unreachable. Please check your connection or try again later.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Server is unreachable. Please check your connection or try again later.")]
    Unreachable(#[source] reqwest::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Status {status}: {message}")]
    Status { status: u16, message: String },

    /// The server answered 2xx but flagged the envelope as unsuccessful.
    #[error("{0}")]
    Rejected(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Pull the server's `message` out of an envelope, falling back to the raw body.
    fn server_message(status: StatusCode, body: &str) -> String {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody { message: Some(message) }) if !message.is_empty() => message,
            _ if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
            _ => Self::truncate_body(body),
        }
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = Self::server_message(status, body);
        match status.as_u16() {
            400 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized(message),
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            429 => ApiError::RateLimited(message),
            code @ 500..=599 => ApiError::ServerError { status: code, message },
            code => ApiError::Status { status: code, message },
        }
    }

    /// HTTP status carried by this error, if the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::BadRequest(_) => Some(400),
            ApiError::AccessDenied(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::RateLimited(_) => Some(429),
            ApiError::ServerError { status, .. } | ApiError::Status { status, .. } => {
                Some(*status)
            }
            ApiError::Unreachable(_)
            | ApiError::Rejected(_)
            | ApiError::InvalidResponse(_)
            | ApiError::InvalidRequest(_) => None,
        }
    }

    /// User-facing message without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            ApiError::Unauthorized(m)
            | ApiError::BadRequest(m)
            | ApiError::AccessDenied(m)
            | ApiError::NotFound(m)
            | ApiError::RateLimited(m)
            | ApiError::Rejected(m)
            | ApiError::InvalidResponse(m)
            | ApiError::InvalidRequest(m) => m.clone(),
            ApiError::ServerError { message, .. } | ApiError::Status { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::Unreachable(_))
    }
}
