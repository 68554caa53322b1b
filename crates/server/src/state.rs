//! Application state shared by the request handlers.

use std::sync::Arc;

use jsonapi_querystring::{QueryConfig, SchemaRegistry};

use crate::config::ServerConfig;

/// Shared application state.
///
/// Holds the schema registry and the server configuration. Both are
/// read-only after startup; every request builds its own
/// [`QueryStringManager`](jsonapi_querystring::QueryStringManager).
///
/// # Type Parameters
///
/// * `R` - The schema registry (must implement [`SchemaRegistry`])
pub struct AppState<R> {
    /// The schema registry.
    registry: Arc<R>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since R is wrapped in Arc and doesn't need to be Clone
impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            config: Arc::clone(&self.config),
        }
    }
}

impl<R: SchemaRegistry> AppState<R> {
    /// Creates a new AppState with the given registry and configuration.
    pub fn new(registry: Arc<R>, config: ServerConfig) -> Self {
        Self {
            registry,
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the schema registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Returns the querystring limits.
    pub fn query_config(&self) -> &QueryConfig {
        &self.config.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonapi_querystring::{SchemaSet, StaticSchema};

    #[test]
    fn test_state_clone_shares_registry() {
        let registry = SchemaSet::new().with(StaticSchema::new("user").field("name"));
        let state = AppState::new(Arc::new(registry), ServerConfig::for_testing());
        let cloned = state.clone();

        assert!(Arc::ptr_eq(&state.registry, &cloned.registry));
        assert!(cloned.registry().schema_for_type("user").is_some());
        assert_eq!(cloned.query_config().page_size, 10);
    }
}
