//! HTTP error handling and automated response generation
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{
    services::{auth::SignInError, errors::StorageError, verification::AuthFailure},
    utils::ratelimit::RateLimitExceeded,
};

/// Represents an HTTP status code, optionally with a custom message.
pub struct HttpError {
    /// The numeric HTTP status code to respond with.
    status: StatusCode,
    /// The message to include in the response.
    message: Option<String>,
}

impl From<StatusCode> for HttpError {
    fn from(err: StatusCode) -> Self {
        Self {
            status: err,
            message: None,
        }
    }
}

impl HttpError {
    /// Construct a new HTTP error with a given status code and message.
    pub const fn new(status: StatusCode, message: Option<String>) -> Self {
        Self { status, message }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let message = self
            .message
            .unwrap_or_else(|| self.status.canonical_reason().unwrap_or("").to_owned());
        (self.status, Json(json!({"message": message}))).into_response()
    }
}

impl From<StorageError> for HttpError {
    fn from(err: StorageError) -> Self {
        eprintln!("Error raised from a storage layer in handler: {err}");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            Some("A storage layer is unavailable.".to_owned()),
        )
    }
}

impl From<AuthFailure> for HttpError {
    fn from(err: AuthFailure) -> Self {
        match err {
            AuthFailure::StorageUnavailable(inner) => Self::from(inner),
            AuthFailure::MissingCredentials
            | AuthFailure::InvalidSession
            | AuthFailure::SessionExpired
            | AuthFailure::SubjectMismatch
            | AuthFailure::ProfileNotFound => {
                Self::new(StatusCode::UNAUTHORIZED, Some(err.to_string()))
            }
        }
    }
}

impl From<SignInError> for HttpError {
    fn from(err: SignInError) -> Self {
        match err {
            SignInError::StorageError(inner) => Self::from(inner),
            SignInError::ForeignEmailDomain | SignInError::UnknownStudent => {
                Self::new(StatusCode::FORBIDDEN, Some(err.to_string()))
            }
        }
    }
}

impl From<RateLimitExceeded> for HttpError {
    fn from(err: RateLimitExceeded) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, Some(err.to_string()))
    }
}
