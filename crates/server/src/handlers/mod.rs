//! HTTP request handlers.
//!
//! - [`health`] - Health and liveness checks
//! - [`query`] - Querystring parsing for a resource type

pub mod health;
pub mod query;

pub use health::health_handler;
pub use query::query_handler;
