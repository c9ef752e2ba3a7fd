//! Request-scoped error taxonomy
//!
//! Every handler failure is recovered here and rendered as a response;
//! nothing escapes as an unhandled fault. Authentication and authorization
//! failures deliberately share a single surface: the same redirect to the
//! login page, with no hint whether the route exists for some other role.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use concours_auth::SessionError;
use concours_media::MediaError;
use sea_orm::DbErr;
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Path of the login surface both denial cases redirect to
pub const LOGIN_REDIRECT: &str = "/login";

#[derive(Debug, Error)]
pub enum ApiError {
    /// No valid session on a gated route
    #[error("Authentication required")]
    AuthRequired,

    /// Valid session, but the role or ownership check failed
    #[error("Not permitted")]
    Forbidden,

    /// Login failed; one message for unknown user and wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Input rejected; surfaced inline with a specific message
    #[error("{0}")]
    Validation(String),

    /// Uniqueness conflict naming the clashing value
    #[error("{field} '{value}' is already assigned")]
    Conflict { field: &'static str, value: String },

    #[error("{0} not found")]
    NotFound(&'static str),

    /// Upload or transform failure
    #[error(transparent)]
    Media(#[from] MediaError),

    /// Database failure; detail is logged, the client gets a generic message
    #[error(transparent)]
    Database(#[from] DbErr),

    /// Session signing failure
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Any other server-side failure; detail is logged, not surfaced
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn body(status: StatusCode, code: &str, message: String) -> Response {
        (
            status,
            Json(ErrorResponse {
                error: message,
                code: Some(code.to_string()),
            }),
        )
            .into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // Both denial cases collapse to one indistinguishable redirect
            ApiError::AuthRequired | ApiError::Forbidden => {
                Redirect::to(LOGIN_REDIRECT).into_response()
            }

            ApiError::InvalidCredentials => Self::body(
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid username or password".to_string(),
            ),

            ApiError::Validation(message) => {
                Self::body(StatusCode::BAD_REQUEST, "VALIDATION", message)
            }

            ApiError::Conflict { field, value } => Self::body(
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("{} '{}' is already assigned", field, value),
            ),

            ApiError::NotFound(what) => Self::body(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{} not found", what),
            ),

            ApiError::Media(err) => {
                let status = match err {
                    MediaError::MissingFile => StatusCode::BAD_REQUEST,
                    MediaError::UnsupportedType(_) => StatusCode::BAD_REQUEST,
                    MediaError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                    MediaError::Processing(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    MediaError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let code = match err {
                    MediaError::MissingFile => "NO_FILE",
                    MediaError::UnsupportedType(_) => "UNSUPPORTED_TYPE",
                    MediaError::TooLarge { .. } => "FILE_TOO_LARGE",
                    MediaError::Processing(_) => "PROCESSING_FAILED",
                    MediaError::Io(_) => "STORAGE_FAILED",
                };
                Self::body(status, code, err.to_string())
            }

            ApiError::Database(err) => {
                // Driver detail stays in the log, never in the response
                error!("Database error: {}", err);
                Self::body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE",
                    "Something went wrong, please try again".to_string(),
                )
            }

            ApiError::Session(err) => {
                error!("Session signing error: {}", err);
                Self::body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SESSION",
                    "Something went wrong, please try again".to_string(),
                )
            }

            ApiError::Internal(detail) => {
                error!("Internal error: {}", detail);
                Self::body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "Something went wrong, please try again".to_string(),
                )
            }
        }
    }
}
