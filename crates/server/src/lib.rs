//! # jsonapi-query-server - JSON:API querystring validation service
//!
//! A small axum service around [`jsonapi_querystring`]. It loads resource
//! schemas from a JSON file and answers `GET /{type}` with the parsed
//! filter, pagination, sparse fieldset, sort and include directives, or with
//! a JSON:API error document naming the offending parameter.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jsonapi_query_server::{create_app_with_config, load_schemas, ServerConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::default();
//!     let schemas = load_schemas("schemas.json")?;
//!
//!     let app = create_app_with_config(Arc::new(schemas), config);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Schema File
//!
//! ```json
//! [
//!   {"type": "user", "name": "UserSchema", "fields": [
//!     {"name": "name"},
//!     {"name": "created_at", "attribute": "created"},
//!     {"name": "posts", "relationship": true}
//!   ]}
//! ]
//! ```
//!
//! ## Architecture
//!
//! - [`config`] - Server configuration
//! - [`error`] - HTTP error mapping
//! - [`state`] - Application state (registry, configuration)
//! - [`handlers`] - HTTP request handlers
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use state::AppState;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use jsonapi_querystring::{SchemaRegistry, SchemaSet};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

/// Creates the Axum application with default configuration.
pub fn create_app<R>(registry: Arc<R>) -> Router
where
    R: SchemaRegistry + Send + Sync + 'static,
{
    create_app_with_config(registry, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// # Arguments
///
/// * `registry` - Schemas the querystrings are validated against
/// * `config` - Server configuration
pub fn create_app_with_config<R>(registry: Arc<R>, config: ServerConfig) -> Router
where
    R: SchemaRegistry + Send + Sync + 'static,
{
    info!(
        page_size = config.query.page_size,
        max_page_size = ?config.query.max_page_size,
        max_include_depth = ?config.query.max_include_depth,
        "Creating querystring server"
    );

    let timeout = std::time::Duration::from_secs(config.request_timeout);
    let state = AppState::new(registry, config);
    let router = routing::create_routes(state);

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            timeout,
        ));

    router.layer(service_builder)
}

/// Loads a JSON array of schemas from `path`.
pub fn load_schemas(path: impl AsRef<Path>) -> anyhow::Result<SchemaSet> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file {}", path.display()))?;
    let schemas = SchemaSet::from_json(&json)
        .with_context(|| format!("Invalid schema file {}", path.display()))?;

    info!(path = %path.display(), resource_types = schemas.len(), "Loaded schemas");
    Ok(schemas)
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "jsonapi_query_server={level},jsonapi_querystring={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_schemas() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"type": "user", "fields": [{{"name": "name"}}]}}]"#
        )
        .unwrap();

        let schemas = load_schemas(file.path()).unwrap();
        assert_eq!(schemas.len(), 1);
        assert!(schemas.get("user").is_some());
    }

    #[test]
    fn test_load_schemas_missing_file() {
        let err = load_schemas("/nonexistent/schemas.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read schema file"));
    }

    #[test]
    fn test_load_schemas_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let err = load_schemas(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid schema file"));
    }
}
