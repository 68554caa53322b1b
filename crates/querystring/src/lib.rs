//! # jsonapi-querystring - JSON:API querystring parsing
//!
//! This crate turns the untrusted querystring of a JSON:API request into
//! schema-validated query directives for a data-access layer. It covers the
//! five query concepts of the [JSON:API specification](https://jsonapi.org/format/#fetching):
//!
//! | Parameter | Accessor | Result |
//! |-----------|----------|--------|
//! | `filter`, `filter[name]=val` | [`QueryStringManager::filters`] | filter objects |
//! | `page[number]`, `page[size]` | [`QueryStringManager::pagination`] | [`PageParams`] |
//! | `fields[type]=a,b` | [`QueryStringManager::fields`] | [`Fieldsets`] |
//! | `sort=-a,b` | [`QueryStringManager::sorting`] | [`SortDirective`]s |
//! | `include=a.b,c` | [`QueryStringManager::include`] | include paths |
//!
//! ## Quick Start
//!
//! ```rust
//! use jsonapi_querystring::{QueryConfig, QueryString, QueryStringManager, SchemaSet, StaticSchema};
//!
//! let registry = SchemaSet::new()
//!     .with(StaticSchema::new("article").field("title").relationship("author"))
//!     .with(StaticSchema::new("people").field("name"));
//! let config = QueryConfig::default();
//!
//! let qs = QueryString::from_query_str("fields[people]=name&include=author&sort=-title");
//! let manager = QueryStringManager::new(qs, registry.get("article").unwrap(), &registry, &config);
//!
//! let directives = manager.directives()?;
//! assert_eq!(directives.include, vec!["author"]);
//! assert_eq!(directives.fields["people"], vec!["name"]);
//! # Ok::<(), jsonapi_querystring::QueryStringError>(())
//! ```
//!
//! ## Error Handling
//!
//! Every accessor fails fast with a [`QueryStringError`]. With the `axum`
//! feature (default) the error implements `IntoResponse` and renders a
//! JSON:API error document whose `source.parameter` names the offending
//! querystring parameter.
//!
//! ## Architecture
//!
//! - [`params`] - Raw querystring map and bracketed-group extraction
//! - [`schema`] - Schema capabilities and registries
//! - [`manager`] - The accessors
//! - [`directives`] - Parsed output types
//! - [`config`] - Pagination and include limits
//! - [`error`] - Error taxonomy and JSON:API error documents

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod directives;
pub mod error;
#[cfg(feature = "axum")]
pub mod extract;
pub mod manager;
pub mod params;
pub mod schema;

// Re-export commonly used types
pub use config::QueryConfig;
pub use directives::{Fieldsets, PageParams, QueryDirectives, SortDirective, SortOrder};
pub use error::{QsResult, QueryStringError};
#[cfg(feature = "axum")]
pub use extract::RawQuery;
pub use manager::{MANAGED_KEYS, QueryStringManager};
pub use params::{ParamValue, QueryString};
pub use schema::{FieldDef, ResourceSchema, SPLIT_REL, SchemaRegistry, SchemaSet, StaticSchema};
