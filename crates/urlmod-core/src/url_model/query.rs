//! Decoded query storage and form-style encoding.
//!
//! The query is kept as an ordered map from key to a scalar or a list of
//! values. List values use the `key[]` convention on the wire.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Value stored under one query key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Scalar(String),
    List(Vec<String>),
}

impl QueryValue {
    /// Empty strings, `"0"` and empty lists count as false, like a loosely typed filter would.
    pub fn is_falsy(&self) -> bool {
        match self {
            QueryValue::Scalar(s) => s.is_empty() || s == "0",
            QueryValue::List(items) => items.is_empty(),
        }
    }

    fn map_strings(&mut self, f: &mut impl FnMut(&str) -> String) {
        match self {
            QueryValue::Scalar(s) => *s = f(s),
            QueryValue::List(items) => {
                for item in items.iter_mut() {
                    *item = f(item);
                }
            }
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Scalar(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Scalar(s)
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        QueryValue::Scalar(n.to_string())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(items: Vec<String>) -> Self {
        QueryValue::List(items)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(items: Vec<&str>) -> Self {
        QueryValue::List(items.into_iter().map(String::from).collect())
    }
}

/// Ordered, decoded query parameters. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(IndexMap<String, QueryValue>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a form-encoded query string. `key[]=a&key[]=b` and
    /// `key[0]=a&key[1]=b` both become a list under `key`; a repeated plain
    /// key keeps its last value.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if key.is_empty() {
                continue;
            }
            match list_base(&key) {
                Some(base) => params.push_list_item(base, value.into_owned()),
                None => {
                    params
                        .0
                        .insert(key.into_owned(), QueryValue::Scalar(value.into_owned()));
                }
            }
        }
        params
    }

    fn push_list_item(&mut self, base: &str, value: String) {
        match self.0.get_mut(base) {
            Some(QueryValue::List(items)) => items.push(value),
            Some(slot) => *slot = QueryValue::List(vec![value]),
            None => {
                self.0.insert(base.to_string(), QueryValue::List(vec![value]));
            }
        }
    }

    /// Form-encodes the parameters. Lists go through an indexed encoding first
    /// and are then rewritten to the bracket-only form.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.0 {
            match value {
                QueryValue::Scalar(v) => {
                    serializer.append_pair(key, v);
                }
                QueryValue::List(items) => {
                    for (i, v) in items.iter().enumerate() {
                        serializer.append_pair(&format!("{key}[{i}]"), v);
                    }
                }
            }
        }
        collapse_indexed_brackets(&serializer.finish())
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Inserts or overwrites; an existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        self.0.shift_remove(key)
    }

    /// Shallow merge: keys from `other` win, new keys are appended.
    pub fn merge(&mut self, other: QueryParams) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }

    /// Drops every entry whose value is falsy.
    pub fn retain_truthy(&mut self) {
        self.0.retain(|_, v| !v.is_falsy());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &QueryValue)> {
        self.0.iter()
    }

    pub(crate) fn map_values(&mut self, mut f: impl FnMut(&str) -> String) {
        for value in self.0.values_mut() {
            value.map_strings(&mut f);
        }
    }
}

impl From<&QueryValue> for serde_json::Value {
    fn from(value: &QueryValue) -> Self {
        match value {
            QueryValue::Scalar(s) => serde_json::Value::String(s.clone()),
            QueryValue::List(items) => items.iter().cloned().collect(),
        }
    }
}

/// Keys in order; lists become arrays.
impl From<&QueryParams> for serde_json::Value {
    fn from(params: &QueryParams) -> Self {
        serde_json::Value::Object(
            params
                .iter()
                .map(|(key, value)| (key.clone(), serde_json::Value::from(value)))
                .collect(),
        )
    }
}

impl From<&str> for QueryParams {
    fn from(query: &str) -> Self {
        QueryParams::parse(query)
    }
}

impl From<String> for QueryParams {
    fn from(query: String) -> Self {
        QueryParams::parse(&query)
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl<K: Into<String>, V: Into<QueryValue>, const N: usize> From<[(K, V); N]> for QueryParams {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// `name[]` or `name[<digits>]` yields `name`.
fn list_base(key: &str) -> Option<&str> {
    let open = key.find('[')?;
    let inner = key[open + 1..].strip_suffix(']')?;
    if open == 0 || !inner.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(&key[..open])
}

/// Rewrites every `%5B<digits>%5D` to `%5B%5D` (case-insensitive escapes).
/// Applying it to its own output changes nothing.
pub fn collapse_indexed_brackets(encoded: &str) -> String {
    let bytes = encoded.as_bytes();
    let mut out = String::with_capacity(encoded.len());
    let mut i = 0;
    while i < bytes.len() {
        if is_escape(&bytes[i..], b'B') {
            let digits = bytes[i + 3..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count();
            let close = i + 3 + digits;
            if digits > 0 && is_escape(&bytes[close..], b'D') {
                out.push_str("%5B%5D");
                i = close + 3;
                continue;
            }
        }
        // Escapes are ASCII; copy one full char otherwise.
        let ch_len = encoded[i..].chars().next().map_or(1, char::len_utf8);
        out.push_str(&encoded[i..i + ch_len]);
        i += ch_len;
    }
    out
}

fn is_escape(bytes: &[u8], last: u8) -> bool {
    bytes.len() >= 3
        && bytes[0] == b'%'
        && bytes[1] == b'5'
        && bytes[2].eq_ignore_ascii_case(&last)
}
