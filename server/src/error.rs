//! Mapping item failures onto HTTP responses.
//!
//! # Design
//! Handlers return `Result<_, ApiError>` and never pick a failure status
//! themselves; `ApiError::into_response` is the only place an `ItemError`
//! becomes a status code and JSON body. Each failure is logged once here,
//! client errors at `warn` and server errors at `error`.

use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use item_core::{FieldError, ItemError, ValidationError};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::config::ConfigError;
use crate::logging::LoggingError;

pub const NOT_FOUND_MESSAGE: &str = "oops, item not found";
pub const NOT_IMPLEMENTED_MESSAGE: &str = "not yet implemented!";

/// A failed item request.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub ItemError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ItemError::MalformedIdentifier { .. } | ItemError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ItemError::NotFound { .. } => StatusCode::NOT_FOUND,
            ItemError::NotImplemented { .. } | ItemError::Unknown(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(ItemError::Validation(err))
    }
}

/// Unreadable JSON bodies count as validation failures on `body`.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ValidationError::unreadable_body(rejection.body_text()).into()
    }
}

/// A path segment that cannot be decoded is a malformed identifier.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(ItemError::malformed_identifier(rejection.body_text()))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a BTreeMap<String, FieldError>>,
}

impl ErrorBody<'_> {
    fn message(message: impl Into<String>) -> Self {
        Self {
            kind: None,
            message: message.into(),
            value: None,
            errors: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_client_error() {
            warn!(status = status.as_u16(), error = %self.0, "item request rejected");
        } else {
            error!(status = status.as_u16(), error = %self.0, "item request failed");
        }

        let body = match &self.0 {
            ItemError::MalformedIdentifier { value } => ErrorBody {
                kind: Some("MalformedIdentifier"),
                message: self.0.to_string(),
                value: Some(value.as_str()),
                errors: None,
            },
            ItemError::Validation(err) => ErrorBody {
                kind: Some("ValidationFailure"),
                message: err.to_string(),
                value: None,
                errors: Some(&err.errors),
            },
            ItemError::NotFound { .. } => ErrorBody::message(NOT_FOUND_MESSAGE),
            ItemError::NotImplemented { .. } => ErrorBody::message(NOT_IMPLEMENTED_MESSAGE),
            ItemError::Unknown(_) => ErrorBody {
                kind: Some("Unknown"),
                message: self.0.to_string(),
                value: None,
                errors: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Fatal errors while starting or running the server binary.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
