//! Axum extractor for the raw querystring.

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

use crate::error::QueryStringError;
use crate::params::QueryString;

/// Axum extractor collecting the request's query pairs into a
/// [`QueryString`].
///
/// Repeated keys are joined with commas.
///
/// # Example
///
/// ```rust,ignore
/// use jsonapi_querystring::RawQuery;
///
/// async fn list_handler(RawQuery(qs): RawQuery) {
///     for (name, value) in qs.iter() {
///         println!("{} = {}", name, value);
///     }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RawQuery(pub QueryString);

impl<S> FromRequestParts<S> for RawQuery
where
    S: Send + Sync,
{
    type Rejection = QueryStringError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|err| QueryStringError::bad_request(err.body_text(), "querystring"))?;

        Ok(RawQuery(QueryString::from_pairs(pairs)))
    }
}
