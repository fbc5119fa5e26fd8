//! The component record and name-keyed access to it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::query::QueryParams;
use crate::error::UrlError;

/// Parsed URL parts. Absent and empty are the same thing: setters store
/// `None` for empty input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlComponents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,
}

/// Component names accepted by index-style access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Scheme,
    Host,
    Port,
    User,
    Pass,
    Path,
    Query,
    Fragment,
}

impl Component {
    pub const ALL: [Component; 8] = [
        Component::Scheme,
        Component::Host,
        Component::Port,
        Component::User,
        Component::Pass,
        Component::Path,
        Component::Query,
        Component::Fragment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Component::Scheme => "scheme",
            Component::Host => "host",
            Component::Port => "port",
            Component::User => "user",
            Component::Pass => "pass",
            Component::Path => "path",
            Component::Query => "query",
            Component::Fragment => "fragment",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Component {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Component::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UrlError::invalid_component("name", s))
    }
}

/// Value returned by index-style reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentValue {
    Text(String),
    Port(u16),
    Query(QueryParams),
}

impl fmt::Display for ComponentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentValue::Text(s) => f.write_str(s),
            ComponentValue::Port(p) => write!(f, "{p}"),
            ComponentValue::Query(q) => f.write_str(&q.encode()),
        }
    }
}

impl From<ComponentValue> for serde_json::Value {
    fn from(value: ComponentValue) -> Self {
        match value {
            ComponentValue::Text(s) => serde_json::Value::String(s),
            ComponentValue::Port(p) => serde_json::Value::from(p),
            ComponentValue::Query(q) => serde_json::Value::from(&q),
        }
    }
}

/// `None` for empty strings.
pub(crate) fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parses a port; empty and `0` mean "no port".
pub(crate) fn parse_port(value: &str) -> Result<Option<u16>, UrlError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse::<u16>() {
        Ok(0) => Ok(None),
        Ok(p) => Ok(Some(p)),
        Err(_) => Err(UrlError::invalid_component("port", value)),
    }
}
