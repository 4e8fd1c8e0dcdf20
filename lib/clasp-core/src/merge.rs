//! Default/override merging for headers and query parameters.
//!
//! Both merges start from the defaults and let every key present in the
//! override replace the whole value list of that key. Values are never
//! appended across the two sets, and the result never aliases its inputs.

use std::collections::BTreeMap;
use std::collections::btree_map;

use http::{HeaderMap, Uri};

use crate::{Result, replace_query};

/// Multi-valued query parameters, kept ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    /// Empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Replace every value of `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.insert(key.into(), vec![value.into()]);
        self
    }

    /// Replace every value of `key` with `values`.
    pub fn set_all<I, V>(&mut self, key: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.entries
            .insert(key.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// First value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values of `key` (empty if absent).
    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Remove `key`, returning its values.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.entries.remove(key)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there is no key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over keys and their values, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Iterate over every `(key, value)` pair, in key order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .flat_map(|(key, values)| values.iter().map(move |value| (key, value.as_str())))
    }

    /// `application/x-www-form-urlencoded` encoding, sorted by key.
    #[must_use]
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs())
            .finish()
    }

    /// Replace the query of `uri` with these parameters.
    ///
    /// An empty set removes the query entirely. The path is left untouched.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTarget`](crate::Error::InvalidTarget) if the URI cannot be rebuilt.
    pub fn apply_to(&self, uri: &mut Uri) -> Result<()> {
        let query = (!self.is_empty()).then(|| self.encode());
        *uri = replace_query(uri, query.as_deref())?;
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Self::new();
        query.extend(iter);
        query
    }
}

impl<K, V> Extend<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

impl IntoIterator for QueryParams {
    type Item = (String, Vec<String>);
    type IntoIter = btree_map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Merge default headers with per-call overrides.
#[must_use]
pub fn merge_headers(defaults: &HeaderMap, overrides: &HeaderMap) -> HeaderMap {
    let mut merged = defaults.clone();
    for name in overrides.keys() {
        merged.remove(name);
        for value in overrides.get_all(name) {
            merged.append(name.clone(), value.clone());
        }
    }
    merged
}

/// Merge default query parameters with per-call overrides.
#[must_use]
pub fn merge_query(defaults: &QueryParams, overrides: &QueryParams) -> QueryParams {
    let mut merged = defaults.clone();
    for (key, values) in overrides.iter() {
        merged.set_all(key, values.iter().map(String::as_str));
    }
    merged
}

#[cfg(test)]
mod tests {
    use assert2::check;
    use http::HeaderValue;
    use http::header::{ACCEPT, HeaderName};

    use super::*;

    fn multi() -> HeaderName {
        HeaderName::from_static("multi-value-header")
    }

    #[test]
    fn query_keeps_multiple_values() {
        let mut query = QueryParams::new();
        query.add("multiquery", "test").add("multiquery", "test2");
        query.set("testquery", "test");

        check!(query.get_all("multiquery") == ["test", "test2"]);
        check!(query.get("testquery") == Some("test"));
        check!(query.get_all("missing").is_empty());
        check!(query.encode() == "multiquery=test&multiquery=test2&testquery=test");
    }

    #[test]
    fn query_encoding_escapes() {
        let query: QueryParams = [("q", "a b&c")].into_iter().collect();
        check!(query.encode() == "q=a+b%26c");
    }

    #[test]
    fn apply_to_replaces_uri_query() {
        let mut uri = Uri::from_static("http://example.com/a/../path?stale=1");
        let query: QueryParams = [("fresh", "2")].into_iter().collect();
        query.apply_to(&mut uri).expect("query");
        check!(uri == "http://example.com/a/../path?fresh=2");

        QueryParams::new().apply_to(&mut uri).expect("no query");
        check!(uri.query().is_none());
    }

    #[test]
    fn header_override_replaces_whole_value_list() {
        let mut defaults = HeaderMap::new();
        defaults.append(multi(), HeaderValue::from_static("test"));
        defaults.append(multi(), HeaderValue::from_static("test2"));
        defaults.insert(ACCEPT, HeaderValue::from_static("text/plain"));

        let mut overrides = HeaderMap::new();
        overrides.insert(multi(), HeaderValue::from_static("only"));

        let merged = merge_headers(&defaults, &overrides);
        let values: Vec<&str> = merged
            .get_all(multi())
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();
        check!(values == ["only"]);
        check!(merged.get(ACCEPT) == Some(&HeaderValue::from_static("text/plain")));
    }

    #[test]
    fn merged_headers_do_not_alias_inputs() {
        let mut defaults = HeaderMap::new();
        defaults.insert(ACCEPT, HeaderValue::from_static("text/plain"));
        let mut overrides = HeaderMap::new();
        overrides.insert(HeaderName::from_static("one-off"), HeaderValue::from_static("one"));

        let mut merged = merge_headers(&defaults, &overrides);
        merged.insert(ACCEPT, HeaderValue::from_static("application/json"));
        merged.remove("one-off");

        check!(defaults.get(ACCEPT) == Some(&HeaderValue::from_static("text/plain")));
        check!(overrides.contains_key("one-off"));
        check!(!defaults.contains_key("one-off"));
    }

    #[test]
    fn query_override_wins_per_key() {
        let mut defaults = QueryParams::new();
        defaults.set("testquery", "test");
        defaults.set_all("multiquery", ["a", "b"]);

        let mut overrides = QueryParams::new();
        overrides.set("testquery", "test-override");

        let mut merged = merge_query(&defaults, &overrides);
        check!(merged.get_all("testquery") == ["test-override"]);
        check!(merged.get_all("multiquery") == ["a", "b"]);

        merged.add("testquery", "extra");
        check!(defaults.get_all("testquery") == ["test"]);
        check!(overrides.get_all("testquery") == ["test-override"]);
    }

    #[test]
    fn merge_with_empty_override_is_a_copy() {
        let defaults: QueryParams = [("k", "v")].into_iter().collect();
        check!(merge_query(&defaults, &QueryParams::new()) == defaults);
        check!(merge_query(&QueryParams::new(), &defaults) == defaults);
    }
}
