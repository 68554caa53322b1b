//! Raw querystring storage and bracketed-group extraction.
//!
//! The transport hands over flat `key=value` pairs. Structured parameters
//! such as `page[number]=2` or `fields[user]=name,email` are recovered on
//! demand with [`QueryString::bracket_group`].

use std::collections::HashMap;

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::error::{QsResult, QueryStringError};

/// An ordered, immutable mapping of querystring keys to values.
///
/// Repeated keys are joined with commas at construction time, keeping the
/// position of the first occurrence.
///
/// # Example
///
/// ```rust
/// use jsonapi_querystring::QueryString;
///
/// let qs = QueryString::from_query_str("include=author&include=comments&sort=-id");
/// assert_eq!(qs.get("include"), Some("author,comments"));
/// assert_eq!(qs.get("sort"), Some("-id"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    entries: Vec<(String, String)>,
    /// Position of each key in `entries`.
    positions: HashMap<String, usize>,
}

impl QueryString {
    /// Creates an empty querystring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a querystring from key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut qs = Self::default();
        for (key, value) in pairs {
            qs.append(key.into(), value.into());
        }
        qs
    }

    fn append(&mut self, key: String, value: String) {
        match self.positions.get(&key) {
            Some(&index) => {
                let existing = &mut self.entries[index].1;
                existing.push(',');
                existing.push_str(&value);
            }
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Parses an `application/x-www-form-urlencoded` querystring.
    ///
    /// A leading `?` is ignored.
    pub fn from_query_str(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()).into_owned())
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.positions
            .get(key)
            .map(|&index| self.entries[index].1.as_str())
    }

    /// Checks if a parameter is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns an iterator over all parameters in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no parameter was sent.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Extracts the bracketed group for `prefix`.
    ///
    /// Every key starting with `prefix` must have the form `prefix[sub]`.
    /// The result maps each sub-key to its value, split on commas when the
    /// value contains one. A later duplicate sub-key replaces an earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`QueryStringError::BadRequest`] naming the offending key when
    /// a matching key has no well-formed `[...]` section.
    pub fn bracket_group(&self, prefix: &str) -> QsResult<Vec<(String, ParamValue)>> {
        let mut group: Vec<(String, ParamValue)> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for (key, value) in self.iter() {
            if !key.starts_with(prefix) {
                continue;
            }

            let sub_key = bracket_content(key)
                .ok_or_else(|| QueryStringError::bad_request("Parse error", key))?;
            let value = ParamValue::parse(value);

            match positions.get(sub_key) {
                Some(&index) => group[index].1 = value,
                None => {
                    positions.insert(sub_key, group.len());
                    group.push((sub_key.to_string(), value));
                }
            }
        }

        Ok(group)
    }

    /// Keeps only the entries whose key satisfies `predicate`.
    pub(crate) fn retain_keys(&self, predicate: impl Fn(&str) -> bool) -> Self {
        Self::from_pairs(self.iter().filter(|&(key, _)| predicate(key)))
    }
}

/// Returns the text between the first `[` and the first `]` after it.
fn bracket_content(key: &str) -> Option<&str> {
    let start = key.find('[')? + 1;
    let len = key[start..].find(']')?;
    Some(&key[start..start + len])
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryString {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl From<HashMap<String, String>> for QueryString {
    fn from(map: HashMap<String, String>) -> Self {
        Self::from_pairs(map)
    }
}

impl Serialize for QueryString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A bracketed-group value: a single string or a comma-split list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Value without a comma.
    Single(String),
    /// Value split on commas.
    List(Vec<String>),
}

impl ParamValue {
    /// Splits `raw` on commas when it contains one.
    pub fn parse(raw: &str) -> Self {
        if raw.contains(',') {
            ParamValue::List(raw.split(',').map(String::from).collect())
        } else {
            ParamValue::Single(raw.to_string())
        }
    }

    /// Returns the single value, or `None` for a list.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            ParamValue::Single(value) => Some(value),
            ParamValue::List(_) => None,
        }
    }

    /// Normalizes the value into a list.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            ParamValue::Single(value) => vec![value],
            ParamValue::List(values) => values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_joins_repeated_keys() {
        let qs = QueryString::from_pairs([
            ("include", "author"),
            ("sort", "name"),
            ("include", "comments"),
        ]);
        assert_eq!(qs.len(), 2);
        assert_eq!(qs.get("include"), Some("author,comments"));
        let keys: Vec<_> = qs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["include", "sort"]);
    }

    #[test]
    fn test_from_query_str_decodes() {
        let qs = QueryString::from_query_str("?page%5Bsize%5D=10&filter=%5B%5D");
        assert_eq!(qs.get("page[size]"), Some("10"));
        assert_eq!(qs.get("filter"), Some("[]"));
    }

    #[test]
    fn test_bracket_group() {
        let qs = QueryString::from_pairs([
            ("page[number]", "2"),
            ("page[size]", "10"),
            ("sort", "name"),
        ]);
        let group = qs.bracket_group("page").unwrap();
        assert_eq!(
            group,
            vec![
                ("number".to_string(), ParamValue::Single("2".to_string())),
                ("size".to_string(), ParamValue::Single("10".to_string())),
            ]
        );
    }

    #[test]
    fn test_bracket_group_splits_lists() {
        let qs = QueryString::from_pairs([("fields[user]", "name,email")]);
        let group = qs.bracket_group("fields").unwrap();
        assert_eq!(
            group[0].1,
            ParamValue::List(vec!["name".to_string(), "email".to_string()])
        );
    }

    #[test]
    fn test_bracket_group_missing_closing_bracket() {
        let qs = QueryString::from_pairs([("page[size", "10")]);
        let err = qs.bracket_group("page").unwrap_err();
        assert_eq!(
            err,
            QueryStringError::bad_request("Parse error", "page[size")
        );
    }

    #[test]
    fn test_bracket_group_without_brackets() {
        let qs = QueryString::from_pairs([("page", "10")]);
        let err = qs.bracket_group("page").unwrap_err();
        assert_eq!(err.parameter(), "page");
    }

    #[test]
    fn test_bracket_group_closing_before_opening() {
        let qs = QueryString::from_pairs([("page]size[", "10")]);
        assert!(qs.bracket_group("page").is_err());
    }

    #[test]
    fn test_bracket_group_ignores_other_keys() {
        let qs = QueryString::from_pairs([("include", "author"), ("sort", "x")]);
        assert!(qs.bracket_group("page").unwrap().is_empty());
    }

    #[test]
    fn test_many_distinct_keys() {
        let qs: QueryString = (0..20_000)
            .map(|n| (format!("filter[k{n}]"), "v".to_string()))
            .collect();
        assert_eq!(qs.len(), 20_000);
        assert_eq!(qs.get("filter[k19999]"), Some("v"));

        let group = qs.bracket_group("filter[").unwrap();
        assert_eq!(group.len(), 20_000);
        assert_eq!(group[0].0, "k0");
        assert_eq!(group[19_999].0, "k19999");
    }

    #[test]
    fn test_bracket_group_last_duplicate_wins() {
        let qs = QueryString::from_pairs([
            ("page[size]", "10"),
            ("page[number]", "1"),
            ("page[size]x", "20"),
        ]);
        let group = qs.bracket_group("page").unwrap();
        assert_eq!(
            group,
            vec![
                ("size".to_string(), ParamValue::Single("20".to_string())),
                ("number".to_string(), ParamValue::Single("1".to_string())),
            ]
        );
    }

    #[test]
    fn test_param_value_into_vec() {
        assert_eq!(ParamValue::parse("a").into_vec(), vec!["a"]);
        assert_eq!(ParamValue::parse("a,b").into_vec(), vec!["a", "b"]);
        assert_eq!(ParamValue::parse("a,b").as_single(), None);
    }
}
