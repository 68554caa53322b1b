//! Health check endpoint handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jsonapi_querystring::SchemaRegistry;
use tracing::debug;

use crate::error::ServerResult;
use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET [base]/health`
///
/// # Response
///
/// - `200 OK` - Server is healthy, with the active page size limits
pub async fn health_handler<R>(State(state): State<AppState<R>>) -> ServerResult<Response>
where
    R: SchemaRegistry + Send + Sync + 'static,
{
    debug!("Processing health check request");

    let query = state.query_config();
    let health_response = serde_json::json!({
        "status": "healthy",
        "page_size": query.page_size,
        "max_page_size": query.max_page_size,
    });

    Ok((StatusCode::OK, Json(health_response)).into_response())
}

/// Handler for a liveness probe.
///
/// # HTTP Request
///
/// `GET [base]/_liveness`
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}
