//! Parsed query directives handed to the data-access layer.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::params::QueryString;

/// Pagination parameters from `page[number]` / `page[size]`.
///
/// A `size` of 0 asks for pagination to be disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    /// Requested page number, when sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<i64>,
    /// Page size, defaulted from configuration.
    pub size: i64,
}

impl PageParams {
    /// Returns `true` when the client asked for all results at once.
    pub fn is_disabled(&self) -> bool {
        self.size == 0
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending (field prefixed with `-`).
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// A single sort instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDirective {
    /// Storage name of the field, or a relationship path left as sent.
    pub field: String,
    /// Sort direction.
    pub order: SortOrder,
}

impl SortDirective {
    /// Creates an ascending directive.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    /// Creates a descending directive.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }
}

/// Sparse fieldsets keyed by resource type.
pub type Fieldsets = BTreeMap<String, Vec<String>>;

/// Every directive parsed from one querystring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryDirectives {
    /// Filter objects, JSON-supplied first.
    pub filters: Vec<serde_json::Value>,
    /// Pagination.
    pub pagination: PageParams,
    /// Sparse fieldsets.
    pub fields: Fieldsets,
    /// Sort instructions in request order.
    pub sorting: Vec<SortDirective>,
    /// Relationship include paths.
    pub include: Vec<String>,
    /// The managed subset of the raw querystring.
    pub querystring: QueryString,
}
