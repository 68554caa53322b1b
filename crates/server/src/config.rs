//! Server configuration.
//!
//! Supports programmatic configuration, command line arguments, and
//! environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `JSONAPI_SERVER_PORT` | 8080 | Server port |
//! | `JSONAPI_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `JSONAPI_LOG_LEVEL` | info | Log level |
//! | `JSONAPI_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `JSONAPI_SCHEMA_FILE` | unset | JSON file with resource schemas |
//!
//! The querystring limits (`JSONAPI_PAGE_SIZE`, `JSONAPI_MAX_PAGE_SIZE`, ...)
//! come from the flattened [`QueryConfig`].
//!
//! # Example
//!
//! ```rust
//! use jsonapi_query_server::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     ..Default::default()
//! };
//! assert_eq!(config.socket_addr(), "0.0.0.0:3000");
//! ```

use std::path::PathBuf;

use clap::Parser;
use jsonapi_querystring::QueryConfig;

/// Server configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "jsonapi-query-server")]
#[command(about = "JSON:API querystring validation server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "JSONAPI_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "JSONAPI_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "JSONAPI_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "JSONAPI_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// JSON file holding an array of resource schemas.
    #[arg(long, env = "JSONAPI_SCHEMA_FILE")]
    pub schema_file: Option<PathBuf>,

    /// Querystring limits.
    #[command(flatten)]
    pub query: QueryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            schema_file: None,
            query: QueryConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// Falls back to defaults when the environment cannot be parsed.
    pub fn from_env() -> Self {
        Self::try_parse_from(["jsonapi-query-server"]).unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if let Err(query_errors) = self.query.validate() {
            errors.extend(query_errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            request_timeout: 5,
            schema_file: None,
            query: QueryConfig {
                page_size: 10,
                allow_disable_pagination: false,
                max_page_size: Some(100),
                max_include_depth: Some(2),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.query.page_size, 30);
    }

    #[test]
    fn test_parse_flattened_query_config() {
        let config = ServerConfig::parse_from([
            "jsonapi-query-server",
            "--port",
            "3000",
            "--max-page-size",
            "50",
            "--schema-file",
            "schemas.json",
        ]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.query.max_page_size, Some(50));
        assert_eq!(config.schema_file, Some(PathBuf::from("schemas.json")));
    }

    #[test]
    fn test_validate_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_port() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().iter().any(|e| e.contains("Port")));
    }

    #[test]
    fn test_validate_reports_query_errors() {
        let config = ServerConfig {
            query: QueryConfig {
                page_size: 200,
                max_page_size: Some(100),
                ..Default::default()
            },
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("max page size")));
    }

    #[test]
    fn test_for_testing() {
        let config = ServerConfig::for_testing();
        assert_eq!(config.port, 0);
        assert!(!config.query.allow_disable_pagination);
    }
}
