//! The querystring manager.
//!
//! [`QueryStringManager`] wraps one request's raw querystring together with
//! the target resource schema and exposes the JSON:API query concepts as
//! independent accessors. Each accessor recomputes its result from the raw
//! map, so they can be called in any order and any number of times.

use tracing::debug;

use crate::config::QueryConfig;
use crate::directives::{Fieldsets, PageParams, QueryDirectives, SortDirective, SortOrder};
use crate::error::{QsResult, QueryStringError};
use crate::params::{ParamValue, QueryString};
use crate::schema::{ResourceSchema, SPLIT_REL, SchemaRegistry};

/// Querystring keys understood by the manager.
pub const MANAGED_KEYS: &[&str] = &["filter", "page", "fields", "sort", "include", "q"];

/// Request-scoped querystring parser.
///
/// # Example
///
/// ```rust
/// use jsonapi_querystring::{
///     QueryConfig, QueryString, QueryStringManager, SchemaSet, SortDirective, StaticSchema,
/// };
///
/// let registry = SchemaSet::new().with(
///     StaticSchema::new("user")
///         .field("name")
///         .aliased_field("created", "created_at"),
/// );
/// let config = QueryConfig::default();
/// let schema = registry.get("user").unwrap();
///
/// let qs = QueryString::from_query_str("sort=-created,name&page[number]=2");
/// let manager = QueryStringManager::new(qs, schema, &registry, &config);
///
/// assert_eq!(
///     manager.sorting().unwrap(),
///     vec![SortDirective::desc("created_at"), SortDirective::asc("name")]
/// );
/// assert_eq!(manager.pagination().unwrap().number, Some(2));
/// assert_eq!(manager.pagination().unwrap().size, 30);
/// ```
pub struct QueryStringManager<'a> {
    qs: QueryString,
    schema: &'a dyn ResourceSchema,
    registry: &'a dyn SchemaRegistry,
    config: &'a QueryConfig,
}

impl<'a> QueryStringManager<'a> {
    /// Creates a manager for one request.
    ///
    /// # Arguments
    ///
    /// * `qs` - The raw querystring
    /// * `schema` - Schema of the resource being queried
    /// * `registry` - Lookup for the schemas named in `fields[...]`
    /// * `config` - Pagination and include limits
    pub fn new(
        qs: QueryString,
        schema: &'a dyn ResourceSchema,
        registry: &'a dyn SchemaRegistry,
        config: &'a QueryConfig,
    ) -> Self {
        Self {
            qs,
            schema,
            registry,
            config,
        }
    }

    /// Returns the raw querystring.
    pub fn raw(&self) -> &QueryString {
        &self.qs
    }

    /// Returns the raw querystring restricted to [`MANAGED_KEYS`].
    ///
    /// Parameters injected by the framework or a proxy are dropped.
    pub fn querystring(&self) -> QueryString {
        self.qs
            .retain_keys(|key| MANAGED_KEYS.iter().any(|managed| key.starts_with(managed)))
    }

    /// Returns the filter objects.
    ///
    /// The JSON array sent as `filter` comes first, unchanged, followed by one
    /// `{"name", "op": "eq", "val"}` object per `filter[name]=val` parameter.
    ///
    /// # Errors
    ///
    /// - [`QueryStringError::InvalidFilters`] if `filter` is not a JSON array
    /// - [`QueryStringError::BadRequest`] if a `filter[` key is malformed
    pub fn filters(&self) -> QsResult<Vec<serde_json::Value>> {
        let mut results = Vec::new();

        if let Some(raw) = self.qs.get("filter") {
            match serde_json::from_str::<serde_json::Value>(raw) {
                Ok(serde_json::Value::Array(filters)) => results.extend(filters),
                Ok(_) => {
                    debug!(filter = %raw, "Rejecting non-array filter");
                    return Err(QueryStringError::InvalidFilters {
                        detail: "Parse error".to_string(),
                    });
                }
                Err(err) => {
                    debug!(filter = %raw, error = %err, "Rejecting malformed filter");
                    return Err(QueryStringError::InvalidFilters {
                        detail: "Parse error".to_string(),
                    });
                }
            }
        }

        results.extend(
            self.qs
                .bracket_group("filter[")?
                .into_iter()
                .map(|(name, value)| simple_filter(name, value)),
        );

        Ok(results)
    }

    /// Returns `page[number]` and `page[size]`.
    ///
    /// A missing size falls back to the configured default.
    ///
    /// # Errors
    ///
    /// [`QueryStringError::BadRequest`] for an unknown `page[...]` key, a
    /// non-integer value, a forbidden `page[size]=0`, or a size above the
    /// configured maximum.
    pub fn pagination(&self) -> QsResult<PageParams> {
        let mut number = None;
        let mut size = None;

        for (key, value) in self.qs.bracket_group("page")? {
            let slot = match key.as_str() {
                "number" => &mut number,
                "size" => &mut size,
                _ => {
                    debug!(key = %key, "Rejecting unknown pagination parameter");
                    return Err(QueryStringError::bad_request(
                        format!("{} is not a valid parameter of pagination", key),
                        "page",
                    ));
                }
            };
            *slot = Some(parse_page_value(&key, &value)?);
        }

        let page = PageParams {
            number,
            size: size.unwrap_or(self.config.page_size),
        };

        if !self.config.allow_disable_pagination && page.size == 0 {
            return Err(QueryStringError::bad_request(
                "You are not allowed to disable pagination",
                "page[size]",
            ));
        }

        if let Some(max) = self.config.max_page_size {
            if page.size > max {
                return Err(QueryStringError::bad_request(
                    format!("Maximum page size is {}", max),
                    "page[size]",
                ));
            }
        }

        Ok(page)
    }

    /// Returns the sparse fieldsets requested with `fields[type]=a,b`.
    ///
    /// # Errors
    ///
    /// - [`QueryStringError::InvalidField`] if a type is unknown to the
    ///   registry or a field is not declared on its schema
    /// - [`QueryStringError::BadRequest`] if a `fields` key is malformed
    pub fn fields(&self) -> QsResult<Fieldsets> {
        let mut fieldsets = Fieldsets::new();

        for (type_name, value) in self.qs.bracket_group("fields")? {
            let fields = value.into_vec();

            let schema = self.registry.schema_for_type(&type_name).ok_or_else(|| {
                QueryStringError::InvalidField {
                    detail: format!("Couldn't find schema for type: {}", type_name),
                }
            })?;

            if let Some(unknown) = fields.iter().find(|field| !schema.has_field(field)) {
                debug!(resource_type = %type_name, field = %unknown, "Rejecting sparse fieldset");
                return Err(QueryStringError::InvalidField {
                    detail: format!("{} has no attribute {}", schema.name(), unknown),
                });
            }

            fieldsets.insert(type_name, fields);
        }

        Ok(fieldsets)
    }

    /// Returns the sort instructions from `sort=-a,b`.
    ///
    /// Fields are translated to their storage names. Relationship paths such
    /// as `author.name` are passed through for the data layer to resolve.
    ///
    /// # Errors
    ///
    /// [`QueryStringError::InvalidSort`] if a field is not declared or is a
    /// relationship.
    pub fn sorting(&self) -> QsResult<Vec<SortDirective>> {
        let sort = match self.qs.get("sort") {
            Some(sort) if !sort.is_empty() => sort,
            _ => return Ok(Vec::new()),
        };

        sort.split(',')
            .map(|token| {
                let (field, order) = match token.strip_prefix('-') {
                    Some(field) => (field, SortOrder::Desc),
                    None => (token, SortOrder::Asc),
                };

                if field.contains(SPLIT_REL) {
                    return Ok(SortDirective {
                        field: field.to_string(),
                        order,
                    });
                }

                if !self.schema.has_field(field) {
                    return Err(QueryStringError::InvalidSort {
                        detail: format!("{} has no attribute {}", self.schema.name(), field),
                    });
                }

                if self.schema.is_relationship(field) {
                    return Err(QueryStringError::InvalidSort {
                        detail: format!(
                            "You can't sort on {} because it is a relationship field",
                            field
                        ),
                    });
                }

                Ok(SortDirective {
                    field: self.schema.model_field(field),
                    order,
                })
            })
            .collect()
    }

    /// Returns the relationship paths from `include=a,b.c`.
    ///
    /// # Errors
    ///
    /// [`QueryStringError::InvalidInclude`] if a path traverses more
    /// relationships than the configured maximum.
    pub fn include(&self) -> QsResult<Vec<String>> {
        let include = match self.qs.get("include") {
            Some(include) if !include.is_empty() => include,
            _ => return Ok(Vec::new()),
        };

        let paths: Vec<String> = include.split(',').map(String::from).collect();

        if let Some(max) = self.config.max_include_depth {
            if let Some(path) = paths
                .iter()
                .find(|path| path.split(SPLIT_REL).count() > max)
            {
                debug!(path = %path, max_depth = max, "Rejecting include path");
                return Err(QueryStringError::InvalidInclude {
                    detail: format!(
                        "You can't use include through more than {} relationships",
                        max
                    ),
                });
            }
        }

        Ok(paths)
    }

    /// Runs every accessor and collects the results.
    ///
    /// The first error encountered is returned, checking filters, pagination,
    /// fields, sorting and include in that order.
    pub fn directives(&self) -> QsResult<QueryDirectives> {
        Ok(QueryDirectives {
            filters: self.filters()?,
            pagination: self.pagination()?,
            fields: self.fields()?,
            sorting: self.sorting()?,
            include: self.include()?,
            querystring: self.querystring(),
        })
    }
}

/// Builds an equality filter object from a `filter[name]=val` parameter.
fn simple_filter(name: String, value: ParamValue) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "op": "eq",
        "val": value,
    })
}

/// Coerces a `page[key]` value to an integer.
fn parse_page_value(key: &str, value: &ParamValue) -> QsResult<i64> {
    value
        .as_single()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .ok_or_else(|| {
            debug!(key = %key, value = ?value, "Rejecting non-integer pagination value");
            QueryStringError::bad_request("Parse error", format!("page[{}]", key))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaSet, StaticSchema};
    use serde_json::json;

    fn registry() -> SchemaSet {
        SchemaSet::new()
            .with(
                StaticSchema::new("user")
                    .named("UserSchema")
                    .field("name")
                    .field("email")
                    .aliased_field("created", "created_at")
                    .relationship("posts"),
            )
            .with(
                StaticSchema::new("post")
                    .field("title")
                    .relationship("author"),
            )
    }

    fn with_manager<T>(
        pairs: &[(&str, &str)],
        config: QueryConfig,
        f: impl FnOnce(&QueryStringManager<'_>) -> T,
    ) -> T {
        let registry = registry();
        let schema = registry.get("user").unwrap();
        let qs = QueryString::from_pairs(pairs.iter().copied());
        let manager = QueryStringManager::new(qs, schema, &registry, &config);
        f(&manager)
    }

    #[test]
    fn test_querystring_keeps_managed_keys() {
        let managed = with_manager(
            &[
                ("filter[name]", "x"),
                ("utm_source", "mail"),
                ("q", "term"),
                ("page[size]", "5"),
                ("_", "12345"),
            ],
            QueryConfig::default(),
            |m| m.querystring(),
        );
        let keys: Vec<_> = managed.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["filter[name]", "q", "page[size]"]);
    }

    #[test]
    fn test_filters_empty() {
        let filters = with_manager(&[], QueryConfig::default(), |m| m.filters()).unwrap();
        assert!(filters.is_empty());
    }

    #[test]
    fn test_filters_json_object_rejected() {
        let err = with_manager(
            &[("filter", r#"{"name": "age"}"#)],
            QueryConfig::default(),
            |m| m.filters(),
        )
        .unwrap_err();
        assert!(matches!(err, QueryStringError::InvalidFilters { .. }));
    }

    #[test]
    fn test_filters_bracket_list_value() {
        let filters = with_manager(
            &[("filter[name]", "alice,bob")],
            QueryConfig::default(),
            |m| m.filters(),
        )
        .unwrap();
        assert_eq!(
            filters,
            vec![json!({"name": "name", "op": "eq", "val": ["alice", "bob"]})]
        );
    }

    #[test]
    fn test_pagination_list_value_rejected() {
        let err = with_manager(&[("page[size]", "1,2")], QueryConfig::default(), |m| {
            m.pagination()
        })
        .unwrap_err();
        assert_eq!(err.parameter(), "page[size]");
    }

    #[test]
    fn test_pagination_trims_whitespace() {
        let page = with_manager(&[("page[number]", " 4 ")], QueryConfig::default(), |m| {
            m.pagination()
        })
        .unwrap();
        assert_eq!(page.number, Some(4));
    }

    #[test]
    fn test_pagination_zero_allowed_by_default() {
        let page = with_manager(&[("page[size]", "0")], QueryConfig::default(), |m| {
            m.pagination()
        })
        .unwrap();
        assert!(page.is_disabled());
    }

    #[test]
    fn test_fields_unknown_type() {
        let err = with_manager(
            &[("fields[comment]", "body")],
            QueryConfig::default(),
            |m| m.fields(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            QueryStringError::InvalidField {
                detail: "Couldn't find schema for type: comment".to_string()
            }
        );
    }

    #[test]
    fn test_fields_accepts_relationship_names() {
        let fields = with_manager(
            &[("fields[user]", "name,posts"), ("fields[post]", "title")],
            QueryConfig::default(),
            |m| m.fields(),
        )
        .unwrap();
        assert_eq!(fields["user"], vec!["name", "posts"]);
        assert_eq!(fields["post"], vec!["title"]);
    }

    #[test]
    fn test_sorting_relationship_path_passthrough() {
        let sorting = with_manager(&[("sort", "-author.name")], QueryConfig::default(), |m| {
            m.sorting()
        })
        .unwrap();
        assert_eq!(sorting, vec![SortDirective::desc("author.name")]);
    }

    #[test]
    fn test_sorting_unknown_field() {
        let err =
            with_manager(&[("sort", "age")], QueryConfig::default(), |m| m.sorting()).unwrap_err();
        assert_eq!(
            err,
            QueryStringError::InvalidSort {
                detail: "UserSchema has no attribute age".to_string()
            }
        );
    }

    #[test]
    fn test_sorting_strips_single_dash() {
        let err = with_manager(&[("sort", "--name")], QueryConfig::default(), |m| {
            m.sorting()
        })
        .unwrap_err();
        assert!(matches!(err, QueryStringError::InvalidSort { .. }));
    }

    #[test]
    fn test_sorting_empty_value() {
        let sorting =
            with_manager(&[("sort", "")], QueryConfig::default(), |m| m.sorting()).unwrap();
        assert!(sorting.is_empty());
    }

    #[test]
    fn test_include_checks_each_path() {
        let config = QueryConfig {
            max_include_depth: Some(2),
            ..Default::default()
        };
        let include = with_manager(&[("include", "posts.author,posts.tags")], config, |m| {
            m.include()
        })
        .unwrap();
        assert_eq!(include, vec!["posts.author", "posts.tags"]);
    }

    #[test]
    fn test_include_rejects_one_deep_path() {
        let config = QueryConfig {
            max_include_depth: Some(2),
            ..Default::default()
        };
        let err = with_manager(&[("include", "posts,posts.author.company")], config, |m| {
            m.include()
        })
        .unwrap_err();
        assert_eq!(
            err.detail(),
            "You can't use include through more than 2 relationships"
        );
    }

    #[test]
    fn test_directives_reports_first_error() {
        let err = with_manager(
            &[("sort", "posts"), ("page[foo]", "1")],
            QueryConfig::default(),
            |m| m.directives(),
        )
        .unwrap_err();
        assert_eq!(err.parameter(), "page");
    }

    #[test]
    fn test_directives() {
        let directives = with_manager(
            &[
                ("filter[name]", "alice"),
                ("page[number]", "1"),
                ("fields[user]", "name"),
                ("sort", "-created"),
                ("include", "posts"),
                ("debug", "1"),
            ],
            QueryConfig::default(),
            |m| m.directives(),
        )
        .unwrap();

        assert_eq!(directives.filters.len(), 1);
        assert_eq!(directives.pagination.size, 30);
        assert_eq!(directives.fields["user"], vec!["name"]);
        assert_eq!(directives.sorting, vec![SortDirective::desc("created_at")]);
        assert_eq!(directives.include, vec!["posts"]);
        assert!(!directives.querystring.contains("debug"));
    }
}
