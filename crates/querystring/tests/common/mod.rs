//! Common test utilities for querystring testing.
//!
//! Provides a small blog schema registry and helpers to build managers.

#![allow(dead_code)]

use jsonapi_querystring::{QueryConfig, QueryString, SchemaSet, StaticSchema};

/// Schema registry used across the integration tests.
///
/// - `user`: `name`, `email`, `created_at` (stored as `created`), relationship `posts`
/// - `post`: `title`, `body`, relationships `author` and `comments`
/// - `comment`: `body`, relationship `author`
pub fn blog_registry() -> SchemaSet {
    SchemaSet::new()
        .with(
            StaticSchema::new("user")
                .named("UserSchema")
                .field("name")
                .field("email")
                .aliased_field("created_at", "created")
                .relationship("posts"),
        )
        .with(
            StaticSchema::new("post")
                .named("PostSchema")
                .field("title")
                .field("body")
                .relationship("author")
                .relationship("comments"),
        )
        .with(
            StaticSchema::new("comment")
                .named("CommentSchema")
                .field("body")
                .relationship("author"),
        )
}

/// Builds a querystring from literal pairs.
pub fn qs(pairs: &[(&str, &str)]) -> QueryString {
    QueryString::from_pairs(pairs.iter().copied())
}

/// Configuration with pagination limits as a typical deployment sets them.
pub fn strict_config() -> QueryConfig {
    QueryConfig {
        page_size: 30,
        allow_disable_pagination: false,
        max_page_size: Some(100),
        max_include_depth: Some(1),
    }
}
