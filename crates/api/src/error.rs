//! Unified error handling with Sentry integration.
//!
//! Provides a unified `ApiError` type that captures server-fault errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, ApiError>`, and every error body is JSON of the shape
//! `{"error": "<message>"}` so the front end has one failure contract.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use driftwood_core::TransitionError;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;
use crate::services::media::MediaError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Authentication or provisioning operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout request was invalid.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Order status transition was rejected.
    #[error("{0}")]
    Transition(#[from] TransitionError),

    /// Storing an uploaded image failed.
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Multipart body could not be read.
    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request is missing valid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but not permitted.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Conflicting state (e.g. duplicate username).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Status code this error maps to.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Repository(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UsernameTaken => StatusCode::CONFLICT,
                AuthError::MissingField(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Checkout(_) | Self::Multipart(_) | Self::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Transition(_) | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Media(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to the client.
    ///
    /// Server-fault details stay out of responses; clients get a generic
    /// message while the specifics go to the log and Sentry.
    fn client_message(&self) -> String {
        match self {
            Self::Auth(AuthError::InvalidCredentials) => "Invalid credentials".to_owned(),
            Self::Auth(AuthError::UsernameTaken) => "Username already taken".to_owned(),
            Self::Auth(AuthError::MissingField(field)) => format!("Missing field: {field}"),
            Self::Repository(RepositoryError::NotFound) => "Not found".to_owned(),
            Self::Repository(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Checkout(err) => err.to_string(),
            Self::Transition(err) => err.to_string(),
            Self::Multipart(err) => format!("Invalid multipart body: {err}"),
            Self::NotFound(msg) => format!("{msg} not found"),
            Self::Validation(msg) | Self::Conflict(msg) => msg.clone(),
            Self::Unauthorized(msg) | Self::Forbidden(msg) => msg.clone(),
            Self::Repository(_) | Self::Auth(_) | Self::Media(_) | Self::Internal(_) => {
                "Internal server error".to_owned()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Capture server faults to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let mut response = (status, Json(json!({ "error": self.client_message() }))).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Basic realm=\"driftwood-admin\""),
            );
        }

        response
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::NotFound("Order".to_owned()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Validation("empty".to_owned()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("no credentials".to_owned()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("not a sales admin".to_owned()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Conflict("taken".to_owned()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Internal("boom".to_owned()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_errors_map_by_kind() {
        assert_eq!(
            ApiError::from(RepositoryError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(RepositoryError::Conflict("dup".to_owned())).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(RepositoryError::DataCorruption("bad".to_owned())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_illegal_transition_maps_to_conflict() {
        use driftwood_core::OrderStatus;

        let err = OrderStatus::Delivered
            .transition_to(OrderStatus::Pending)
            .unwrap_err();
        assert_eq!(ApiError::from(err).status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_server_fault_details_are_not_exposed() {
        let err = ApiError::Internal("connection pool exhausted".to_owned());
        assert_eq!(err.client_message(), "Internal server error");
    }
}
