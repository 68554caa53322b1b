//! Querystring limits configuration.
//!
//! The limits are passed explicitly to every [`QueryStringManager`]; nothing
//! is read from global state while parsing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `JSONAPI_PAGE_SIZE` | 30 | Page size used when `page[size]` is absent |
//! | `JSONAPI_ALLOW_DISABLE_PAGINATION` | true | Whether `page[size]=0` is accepted |
//! | `JSONAPI_MAX_PAGE_SIZE` | unset | Upper bound for `page[size]` |
//! | `JSONAPI_MAX_INCLUDE_DEPTH` | unset | Maximum relationships per include path |
//!
//! # Example
//!
//! ```rust
//! use jsonapi_querystring::QueryConfig;
//!
//! let config = QueryConfig {
//!     max_page_size: Some(100),
//!     max_include_depth: Some(2),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```
//!
//! [`QueryStringManager`]: crate::QueryStringManager

use clap::{ArgAction, Args};

/// Default page size when none is configured.
pub const DEFAULT_PAGE_SIZE: i64 = 30;

/// Pagination and inclusion limits applied by the querystring accessors.
///
/// Derives [`clap::Args`] so it can be flattened into a binary's command
/// line, with environment variable fallbacks.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct QueryConfig {
    /// Page size used when the request does not send `page[size]`.
    #[arg(long = "page-size", env = "JSONAPI_PAGE_SIZE", default_value = "30")]
    pub page_size: i64,

    /// Accept `page[size]=0` as a request to disable pagination.
    #[arg(
        long,
        env = "JSONAPI_ALLOW_DISABLE_PAGINATION",
        default_value = "true",
        action = ArgAction::Set
    )]
    pub allow_disable_pagination: bool,

    /// Maximum accepted `page[size]`.
    #[arg(long, env = "JSONAPI_MAX_PAGE_SIZE")]
    pub max_page_size: Option<i64>,

    /// Maximum number of relationships an include path may traverse.
    #[arg(long, env = "JSONAPI_MAX_INCLUDE_DEPTH")]
    pub max_include_depth: Option<usize>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            allow_disable_pagination: true,
            max_page_size: None,
            max_include_depth: None,
        }
    }
}

impl QueryConfig {
    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.page_size < 0 {
            errors.push("Page size cannot be negative".to_string());
        }

        if self.page_size == 0 && !self.allow_disable_pagination {
            errors.push(
                "Default page size cannot be 0 when disabling pagination is not allowed"
                    .to_string(),
            );
        }

        if let Some(max) = self.max_page_size {
            if max < 0 {
                errors.push("Max page size cannot be negative".to_string());
            } else if self.page_size > max {
                errors.push("Default page size cannot exceed max page size".to_string());
            }
        }

        if self.max_include_depth == Some(0) {
            errors.push("Max include depth cannot be 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
