//! Error types for the HTTP layer.
//!
//! Querystring validation errors pass through unchanged; the server adds
//! the failures that only exist at the HTTP boundary. Every error is
//! rendered as a JSON:API error document.
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Query | 400 |
//! | UnknownResourceType | 404 |
//! | Internal | 500 |

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use jsonapi_querystring::QueryStringError;
use jsonapi_querystring::error::{JSONAPI_MEDIA_TYPE, create_error_document};
use thiserror::Error;

/// The primary error type for request handlers.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The querystring failed validation.
    #[error(transparent)]
    Query(#[from] QueryStringError),

    /// No schema is registered for the requested type.
    #[error("unknown resource type: {resource_type}")]
    UnknownResourceType {
        /// The requested type name.
        resource_type: String,
    },

    /// Unexpected failure.
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, title, detail) = match self {
            ServerError::Query(err) => return err.into_response(),
            ServerError::UnknownResourceType { resource_type } => (
                StatusCode::NOT_FOUND,
                "Resource type not found",
                format!("No schema registered for type {}", resource_type),
            ),
            ServerError::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                message,
            ),
        };

        let document = create_error_document(status.as_u16(), title, &detail, None);
        let mut response = (status, Json(document)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(JSONAPI_MEDIA_TYPE),
        );
        response
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::Internal {
            message: format!("JSON serialization failed: {}", err),
        }
    }
}

/// Result type alias for handlers.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_resource_type_display() {
        let err = ServerError::UnknownResourceType {
            resource_type: "widget".to_string(),
        };
        assert_eq!(err.to_string(), "unknown resource type: widget");
    }

    #[test]
    fn test_query_error_is_transparent() {
        let err: ServerError = QueryStringError::bad_request("Parse error", "page").into();
        assert_eq!(err.to_string(), "bad request (page): Parse error");
    }

    #[test]
    fn test_status_codes() {
        let not_found = ServerError::UnknownResourceType {
            resource_type: "widget".to_string(),
        }
        .into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let bad_request = ServerError::from(QueryStringError::InvalidSort {
            detail: "x".to_string(),
        })
        .into_response();
        assert_eq!(bad_request.status(), StatusCode::BAD_REQUEST);

        let internal = ServerError::Internal {
            message: "boom".to_string(),
        }
        .into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
