//! Input forms accepted by the modify engine.

use serde_json::Value;

use crate::error::UrlError;
use crate::url_model::QueryValue;

/// A whole modify request: a bare URL, or an ordered edit list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModifySpec {
    Url(String),
    Edits(Vec<Edit>),
}

/// One item of an edit list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// A bare value: the source URL (first item only) or a `!` removal.
    Positional(Option<String>),
    /// A key/value instruction.
    Pair(String, EditValue),
}

impl Edit {
    pub fn positional(value: impl Into<String>) -> Self {
        Edit::Positional(Some(value.into()))
    }

    pub fn pair(key: impl Into<String>, value: impl Into<EditValue>) -> Self {
        Edit::Pair(key.into(), value.into())
    }
}

/// Loosely typed instruction value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditValue {
    Null,
    Bool(bool),
    Text(String),
    List(Vec<String>),
}

impl EditValue {
    /// Text form; `true` is `"1"`, `false` and null are empty. Lists have no text form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            EditValue::Null | EditValue::Bool(false) => Some(String::new()),
            EditValue::Bool(true) => Some("1".to_string()),
            EditValue::Text(s) => Some(s.clone()),
            EditValue::List(_) => None,
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            EditValue::Null => false,
            EditValue::Bool(b) => *b,
            EditValue::Text(s) => !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false")),
            EditValue::List(items) => !items.is_empty(),
        }
    }

    pub fn to_query_value(&self) -> QueryValue {
        match self {
            EditValue::List(items) => QueryValue::List(items.clone()),
            other => QueryValue::Scalar(other.as_text().unwrap_or_default()),
        }
    }

    fn from_json(value: &Value) -> Result<Self, UrlError> {
        Ok(match value {
            Value::Null => EditValue::Null,
            Value::Bool(b) => EditValue::Bool(*b),
            Value::Number(n) => EditValue::Text(n.to_string()),
            Value::String(s) => EditValue::Text(s.clone()),
            Value::Array(items) => EditValue::List(
                items
                    .iter()
                    .map(|item| match EditValue::from_json(item)?.as_text() {
                        Some(text) => Ok(text),
                        None => Err(UrlError::InvalidModifySpec(
                            "nested lists are not supported".into(),
                        )),
                    })
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(_) => {
                return Err(UrlError::InvalidModifySpec(
                    "instruction values cannot be objects".into(),
                ))
            }
        })
    }
}

impl From<&str> for EditValue {
    fn from(s: &str) -> Self {
        EditValue::Text(s.to_string())
    }
}

impl From<String> for EditValue {
    fn from(s: String) -> Self {
        EditValue::Text(s)
    }
}

impl From<i64> for EditValue {
    fn from(n: i64) -> Self {
        EditValue::Text(n.to_string())
    }
}

impl From<bool> for EditValue {
    fn from(b: bool) -> Self {
        EditValue::Bool(b)
    }
}

impl From<Vec<&str>> for EditValue {
    fn from(items: Vec<&str>) -> Self {
        EditValue::List(items.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for EditValue {
    fn from(items: Vec<String>) -> Self {
        EditValue::List(items)
    }
}

impl From<&str> for ModifySpec {
    fn from(url: &str) -> Self {
        ModifySpec::Url(url.to_string())
    }
}

impl From<Vec<Edit>> for ModifySpec {
    fn from(edits: Vec<Edit>) -> Self {
        ModifySpec::Edits(edits)
    }
}

/// JSON form: a string is a URL; an array is an edit list whose items are
/// strings/null (positional) or objects (one instruction per key, in order).
impl TryFrom<&Value> for ModifySpec {
    type Error = UrlError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(url) => Ok(ModifySpec::Url(url.clone())),
            Value::Array(items) => {
                let mut edits = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Null => edits.push(Edit::Positional(None)),
                        Value::String(s) => edits.push(Edit::Positional(Some(s.clone()))),
                        Value::Object(map) => {
                            for (key, value) in map {
                                edits.push(Edit::Pair(key.clone(), EditValue::from_json(value)?));
                            }
                        }
                        other => {
                            return Err(UrlError::InvalidModifySpec(format!(
                                "unsupported edit item {other}"
                            )))
                        }
                    }
                }
                Ok(ModifySpec::Edits(edits))
            }
            other => Err(UrlError::InvalidModifySpec(format!(
                "expected a URL string or an edit list, got {other}"
            ))),
        }
    }
}
