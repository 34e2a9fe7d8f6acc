//! Uniform HTTP failure type.
//!
//! # Invariants
//! - Every failure renders as `{message, error?}`; `message` is client-facing.
//! - Internal errors are logged once, when rendered.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::Serialize;
use std::fmt::Display;

const INVALID_BODY_MESSAGE: &str = "Corpo da requisição inválido.";

/// Uniform failure for every route handler.
///
/// `message` is the client-facing text; `cause` carries the underlying error
/// when one exists.
#[derive(Debug)]
pub enum ApiError {
    BadRequest {
        message: String,
        cause: Option<String>,
    },
    NotFound {
        message: String,
    },
    Internal {
        message: String,
        cause: Option<String>,
    },
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            cause: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>, cause: impl Display) -> Self {
        Self::Internal {
            message: message.into(),
            cause: Some(cause.to_string()),
        }
    }

    /// Attaches `cause` to a bad-request error; other variants are unchanged.
    pub fn with_cause(self, cause: impl Display) -> Self {
        match self {
            Self::BadRequest { message, .. } => Self::BadRequest {
                message,
                cause: Some(cause.to_string()),
            },
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(INVALID_BODY_MESSAGE).with_cause(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::BadRequest { message, cause } => ErrorBody {
                message,
                error: cause,
            },
            Self::NotFound { message } => ErrorBody {
                message,
                error: None,
            },
            Self::Internal { message, cause } => {
                error!(
                    "event=http_error module=http status=error message={} cause={}",
                    message,
                    cause.as_deref().unwrap_or("none")
                );
                ErrorBody {
                    message,
                    error: cause,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
