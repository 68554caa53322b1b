//! JSON:API querystring validation server.

use std::sync::Arc;

use clap::Parser;
use jsonapi_query_server::{ServerConfig, create_app_with_config, init_logging, load_schemas};
use jsonapi_querystring::SchemaSet;
use tracing::{info, warn};

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let schemas = match &config.schema_file {
        Some(path) => load_schemas(path)?,
        None => {
            warn!("No schema file configured; every resource type will return 404");
            SchemaSet::new()
        }
    };

    info!(
        port = config.port,
        host = %config.host,
        resource_types = schemas.len(),
        "Starting JSON:API querystring server"
    );

    let app = create_app_with_config(Arc::new(schemas), config.clone());
    serve(app, &config).await
}
