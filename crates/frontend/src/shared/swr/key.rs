//! Cache keys: endpoint path + normalized query parameters.
//!
//! Two logically identical requests must map to the same key, so parameters
//! are kept sorted and `Null` values are dropped from the canonical form.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single query-string value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Bool(bool),
    /// Serialized as repeated `key[]=value` entries
    List(Vec<String>),
    /// Omitted from the query string
    Null,
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::List(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ParamValue::Null)
    }
}

/// Flat parameter object of a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, ParamValue>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn extend(&mut self, other: QueryParams) {
        self.0.extend(other.0);
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// No value would reach the query string
    pub fn is_empty(&self) -> bool {
        self.0.values().all(|v| matches!(v, ParamValue::Null))
    }

    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::new();
        for (key, value) in &self.0 {
            let name = urlencoding::encode(key);
            match value {
                ParamValue::Null => {}
                ParamValue::Str(s) => parts.push(format!("{}={}", name, urlencoding::encode(s))),
                ParamValue::Int(i) => parts.push(format!("{}={}", name, i)),
                ParamValue::Bool(b) => parts.push(format!("{}={}", name, b)),
                ParamValue::List(items) => {
                    for item in items {
                        parts.push(format!("{}[]={}", name, urlencoding::encode(item)));
                    }
                }
            }
        }
        parts.join("&")
    }
}

/// Address of one cache entry
#[derive(Debug, Clone)]
pub struct Key {
    path: String,
    params: QueryParams,
}

impl Key {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: QueryParams::new(),
        }
    }

    pub fn with_params(path: impl Into<String>, params: QueryParams) -> Self {
        Self {
            path: path.into(),
            params,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Relative URL; doubles as the canonical cache key
    pub fn url(&self) -> String {
        let qs = self.params.to_query_string();
        if qs.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, qs)
        }
    }

    pub fn canonical(&self) -> String {
        self.url()
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_is_order_independent() {
        let a = QueryParams::new().with("page", 1usize).with("search", "acme");
        let b = QueryParams::new().with("search", "acme").with("page", 1usize);
        assert_eq!(
            Key::with_params("/api/clients", a),
            Key::with_params("/api/clients", b)
        );
    }

    #[test]
    fn test_null_is_omitted() {
        let with_null = QueryParams::new()
            .with("page", 0usize)
            .with("stage", None::<String>);
        let without = QueryParams::new().with("page", 0usize);
        assert_eq!(
            Key::with_params("/api/leads", with_null).canonical(),
            "/api/leads?page=0"
        );
        assert_eq!(Key::with_params("/api/leads", without).canonical(), "/api/leads?page=0");
    }

    #[test]
    fn test_list_serialized_as_repeated_brackets() {
        let params = QueryParams::new().with("tags", vec!["a b".to_string(), "c".to_string()]);
        assert_eq!(params.to_query_string(), "tags[]=a%20b&tags[]=c");
    }

    #[test]
    fn test_bare_path_key() {
        let key = Key::new("/api/todos");
        assert_eq!(key.url(), "/api/todos");
        assert!(key.params().is_empty());
    }
}
