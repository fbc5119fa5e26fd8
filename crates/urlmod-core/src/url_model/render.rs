//! Rendering a model back into a URL string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::component::{non_empty, UrlComponents};
use super::path::normalize_path;
use super::sanitize::strip_tags;
use super::UrlModel;
use crate::error::UrlError;
use crate::protect;

/// Output form of [`UrlModel::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// `/path?query#fragment`
    #[default]
    #[serde(rename = "rel")]
    Relative,
    /// `scheme://host/...`, or `//host/...` when no scheme is known.
    #[serde(rename = "abs")]
    Absolute,
    /// `//host/...`
    #[serde(rename = "short_abs")]
    ShortAbsolute,
    /// Absolute with the scheme forced to `http`.
    Http,
    /// Absolute with the scheme forced to `https`.
    Https,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Relative => "rel",
            Mode::Absolute => "abs",
            Mode::ShortAbsolute => "short_abs",
            Mode::Http => "http",
            Mode::Https => "https",
        }
    }

    fn forced_scheme(self) -> Option<&'static str> {
        match self {
            Mode::Http => Some("http"),
            Mode::Https => Some("https"),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rel" => Ok(Mode::Relative),
            "abs" => Ok(Mode::Absolute),
            "short_abs" => Ok(Mode::ShortAbsolute),
            "http" => Ok(Mode::Http),
            "https" => Ok(Mode::Https),
            other => Err(UrlError::InvalidModifySpec(format!(
                "unknown render mode {other:?}"
            ))),
        }
    }
}

impl UrlModel {
    /// Renders the model. The stored components are left untouched.
    ///
    /// Absolute-style modes fill a missing host (and, for absolute modes, a
    /// missing scheme) from the current request and fall back to `//host`
    /// when no scheme is known. The CSRF parameter is added last, then the
    /// string is assembled, tag-stripped, and finally passed through the
    /// protect guard.
    pub fn get(&self, mode: Mode) -> Result<String, UrlError> {
        let mut data = self.components.clone();
        let mut mode = mode;

        if mode == Mode::Relative {
            data.scheme = None;
            data.host = None;
            data.user = None;
            data.pass = None;
            data.port = None;
        } else {
            if data.host.is_none() {
                data.host = non_empty(&self.env.request.host());
                if mode != Mode::ShortAbsolute && data.scheme.is_none() {
                    data.scheme = non_empty(&self.env.request.scheme());
                }
            }
            split_host_port(&mut data);
            if let (Some(forced), Some(_)) = (mode.forced_scheme(), data.host.as_ref()) {
                data.scheme = Some(forced.to_string());
            }
            if data.scheme.is_none() || mode == Mode::ShortAbsolute {
                mode = Mode::ShortAbsolute;
                data.scheme = None;
            }
        }

        if self.config.csrf {
            if let Some(tokens) = &self.env.tokens {
                data.query
                    .get_or_insert_with(Default::default)
                    .insert(tokens.param_name(), tokens.issue_token());
            }
        }

        let mut url = assemble(&data);
        if self.config.strip {
            url = strip_tags(&url);
        }
        if url.is_empty() {
            url = self.config.dummy.clone();
        }
        tracing::debug!(mode = %mode, url = %url, "rendered url");

        if mode == Mode::Relative {
            return Ok(url);
        }
        protect::guard(self, url, data.host.as_deref())
    }

    pub fn get_relative(&self) -> Result<String, UrlError> {
        self.get(Mode::Relative)
    }

    pub fn get_absolute(&self) -> Result<String, UrlError> {
        self.get(Mode::Absolute)
    }

    pub fn get_short_absolute(&self) -> Result<String, UrlError> {
        self.get(Mode::ShortAbsolute)
    }

    pub fn get_http(&self) -> Result<String, UrlError> {
        self.get(Mode::Http)
    }

    pub fn get_https(&self) -> Result<String, UrlError> {
        self.get(Mode::Https)
    }
}

/// String form is the absolute render; a failing render shows the dummy value.
impl fmt::Display for UrlModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get_absolute() {
            Ok(url) => f.write_str(&url),
            Err(err) => {
                tracing::warn!(error = %err, "absolute render failed");
                f.write_str(&self.config.dummy)
            }
        }
    }
}

/// `site.com:8080` in the host slot (as reported by a request) moves the port
/// out unless one is already set.
fn split_host_port(data: &mut UrlComponents) {
    let Some(host) = data.host.as_deref() else {
        return;
    };
    if host.starts_with('[') {
        return;
    }
    if let Some((name, port)) = host.rsplit_once(':') {
        if let Ok(port) = port.parse::<u16>() {
            if data.port.is_none() && port != 0 {
                data.port = Some(port);
            }
            data.host = non_empty(name);
        }
    }
}

/// `scheme://[user[:pass]@]host[:port]path[?query][#fragment]`; the scheme
/// part is `//` alone when a host is present without a scheme.
fn assemble(data: &UrlComponents) -> String {
    let mut url = String::new();
    match (data.scheme.as_deref(), data.host.as_deref()) {
        (Some(scheme), Some(_)) => {
            url.push_str(scheme);
            url.push_str("://");
        }
        (Some(scheme), None) => {
            url.push_str(scheme);
            url.push(':');
        }
        (None, Some(_)) => url.push_str("//"),
        (None, None) => {}
    }

    if let Some(host) = data.host.as_deref() {
        if let Some(user) = data.user.as_deref() {
            url.push_str(user);
            if let Some(pass) = data.pass.as_deref() {
                url.push(':');
                url.push_str(pass);
            }
            url.push('@');
        }
        url.push_str(host);
        if let Some(port) = data.port {
            url.push(':');
            url.push_str(&port.to_string());
        }
    }

    if let Some(path) = data.path.as_deref() {
        let path = normalize_path(path);
        if data.host.is_some() && !path.is_empty() && !path.starts_with('/') {
            url.push('/');
        }
        url.push_str(&path);
    }

    if let Some(query) = data.query.as_ref().filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(&query.encode());
    }

    if let Some(fragment) = data.fragment.as_deref().filter(|f| !f.is_empty()) {
        url.push('#');
        url.push_str(fragment);
    }
    url
}
