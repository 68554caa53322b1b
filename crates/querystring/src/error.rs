//! Error types for querystring validation.
//!
//! Every error here is a client-input error: it is raised at the point of
//! detection, never retried, and rendered as a JSON:API error document.
//!
//! # Error Mapping
//!
//! | Error | HTTP Status | Title | Source parameter |
//! |-------|-------------|-------|------------------|
//! | BadRequest | 400 | Bad request | offending parameter |
//! | InvalidFilters | 400 | Invalid filters querystring parameter. | `filter` |
//! | InvalidField | 400 | Invalid fields querystring parameter. | `fields` |
//! | InvalidSort | 400 | Invalid sort querystring parameter. | `sort` |
//! | InvalidInclude | 400 | Invalid include querystring parameter. | `include` |

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// JSON:API version advertised in error documents.
pub const JSONAPI_VERSION: &str = "1.0";

/// The error type for all querystring accessors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryStringError {
    /// A structurally malformed parameter.
    #[error("bad request ({parameter}): {detail}")]
    BadRequest { detail: String, parameter: String },

    /// The `filter` value is not a JSON array.
    #[error("invalid filters: {detail}")]
    InvalidFilters { detail: String },

    /// A sparse-fieldset field is not declared on its resource schema.
    #[error("invalid field: {detail}")]
    InvalidField { detail: String },

    /// A sort field is unknown or is a relationship.
    #[error("invalid sort: {detail}")]
    InvalidSort { detail: String },

    /// An include path is deeper than the configured maximum.
    #[error("invalid include: {detail}")]
    InvalidInclude { detail: String },
}

impl QueryStringError {
    /// Shorthand for a [`QueryStringError::BadRequest`].
    pub fn bad_request(detail: impl Into<String>, parameter: impl Into<String>) -> Self {
        QueryStringError::BadRequest {
            detail: detail.into(),
            parameter: parameter.into(),
        }
    }

    /// HTTP status code carried by the error.
    pub fn status(&self) -> u16 {
        400
    }

    /// JSON:API error title.
    pub fn title(&self) -> &'static str {
        match self {
            QueryStringError::BadRequest { .. } => "Bad request",
            QueryStringError::InvalidFilters { .. } => "Invalid filters querystring parameter.",
            QueryStringError::InvalidField { .. } => "Invalid fields querystring parameter.",
            QueryStringError::InvalidSort { .. } => "Invalid sort querystring parameter.",
            QueryStringError::InvalidInclude { .. } => "Invalid include querystring parameter.",
        }
    }

    /// Human-readable detail message.
    pub fn detail(&self) -> &str {
        match self {
            QueryStringError::BadRequest { detail, .. }
            | QueryStringError::InvalidFilters { detail }
            | QueryStringError::InvalidField { detail }
            | QueryStringError::InvalidSort { detail }
            | QueryStringError::InvalidInclude { detail } => detail,
        }
    }

    /// The querystring parameter the error points at.
    pub fn parameter(&self) -> &str {
        match self {
            QueryStringError::BadRequest { parameter, .. } => parameter,
            QueryStringError::InvalidFilters { .. } => "filter",
            QueryStringError::InvalidField { .. } => "fields",
            QueryStringError::InvalidSort { .. } => "sort",
            QueryStringError::InvalidInclude { .. } => "include",
        }
    }

    /// Renders the error as a JSON:API error document.
    pub fn to_document(&self) -> serde_json::Value {
        create_error_document(
            self.status(),
            self.title(),
            self.detail(),
            Some(self.parameter()),
        )
    }
}

/// Creates a JSON:API error document with a single error object.
///
/// # Arguments
///
/// * `status` - The HTTP status code
/// * `title` - Short summary of the problem
/// * `detail` - Human-readable explanation
/// * `parameter` - The querystring parameter that caused the error, if any
pub fn create_error_document(
    status: u16,
    title: &str,
    detail: &str,
    parameter: Option<&str>,
) -> serde_json::Value {
    let mut error = serde_json::json!({
        "status": status.to_string(),
        "title": title,
        "detail": detail,
    });
    if let Some(parameter) = parameter {
        error["source"] = serde_json::json!({ "parameter": parameter });
    }

    serde_json::json!({
        "errors": [error],
        "jsonapi": { "version": JSONAPI_VERSION }
    })
}

#[cfg(feature = "axum")]
mod response {
    use axum::{
        Json,
        http::{HeaderValue, StatusCode, header},
        response::{IntoResponse, Response},
    };

    use super::QueryStringError;

    /// Media type of JSON:API documents.
    pub const JSONAPI_MEDIA_TYPE: &str = "application/vnd.api+json";

    impl IntoResponse for QueryStringError {
        fn into_response(self) -> Response {
            let status = StatusCode::from_u16(self.status()).unwrap_or(StatusCode::BAD_REQUEST);
            let mut response = (status, Json(self.to_document())).into_response();
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(JSONAPI_MEDIA_TYPE),
            );
            response
        }
    }
}

#[cfg(feature = "axum")]
pub use response::JSONAPI_MEDIA_TYPE;

/// Result type alias for querystring accessors.
pub type QsResult<T> = Result<T, QueryStringError>;
