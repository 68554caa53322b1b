//! Querystring parsing handler.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jsonapi_querystring::{QueryStringManager, RawQuery, SchemaRegistry};
use tracing::debug;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Handler for parsing a resource querystring.
///
/// Resolves the schema for `resource_type`, runs every querystring accessor
/// and returns the parsed directives.
///
/// # HTTP Request
///
/// `GET [base]/[type]?filter=...&page[size]=...&fields[type]=...&sort=...&include=...`
///
/// # Response
///
/// - `200 OK` - `{"type": ..., "directives": {...}}`
/// - `400 Bad Request` - JSON:API error document naming the parameter
/// - `404 Not Found` - No schema registered for the type
pub async fn query_handler<R>(
    State(state): State<AppState<R>>,
    Path(resource_type): Path<String>,
    RawQuery(qs): RawQuery,
) -> ServerResult<Response>
where
    R: SchemaRegistry + Send + Sync + 'static,
{
    debug!(resource_type = %resource_type, params = qs.len(), "Processing query request");

    let schema = state
        .registry()
        .schema_for_type(&resource_type)
        .ok_or_else(|| ServerError::UnknownResourceType {
            resource_type: resource_type.clone(),
        })?;

    let manager = QueryStringManager::new(qs, schema, state.registry(), state.query_config());
    let directives = manager.directives().inspect_err(|err| {
        debug!(
            resource_type = %resource_type,
            parameter = err.parameter(),
            error = %err,
            "Rejected querystring"
        );
    })?;

    let body = serde_json::json!({
        "type": resource_type,
        "directives": serde_json::to_value(&directives)?,
    });

    Ok((StatusCode::OK, Json(body)).into_response())
}
