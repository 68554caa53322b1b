//! Route configuration.

use axum::{Router, routing::get};
use jsonapi_querystring::SchemaRegistry;

use crate::handlers;
use crate::state::AppState;

/// Creates all routes.
///
/// # Routes
///
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness probe
/// - `GET /{type}` - Parse and validate the querystring for a resource type
///
/// The fixed routes take precedence, so resource types named `health` or
/// `_liveness` cannot be queried.
pub fn create_routes<R>(state: AppState<R>) -> Router
where
    R: SchemaRegistry + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(handlers::health_handler::<R>))
        .route("/_liveness", get(handlers::health::liveness_handler))
        .route("/{resource_type}", get(handlers::query_handler::<R>))
        .with_state(state)
}
