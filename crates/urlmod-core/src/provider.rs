//! Collaborator interfaces the URL model consumes, plus small in-process
//! implementations of each.
//!
//! The model never looks anything up globally: the current request, token
//! issuance and alias lookup all come in through an [`Environment`] handed to
//! the constructor.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::UrlError;
use crate::url_model::parse_components;

/// Prefix marking a string as a symbolic alias name rather than a literal value.
pub const ALIAS_PREFIX: char = '@';

/// The in-flight request whose URL is the default construction source.
pub trait CurrentRequestProvider: Send + Sync {
    /// Scheme of the current request; empty when unknown.
    fn scheme(&self) -> String;
    /// Host of the current request, optionally with a `:port` suffix.
    fn host(&self) -> String;
    /// Full URL of the current request.
    fn absolute_url(&self) -> String;
}

/// Issues CSRF tokens appended to rendered URLs.
pub trait TokenProvider: Send + Sync {
    fn param_name(&self) -> String;
    fn issue_token(&self) -> String;
}

/// Resolves symbolic names (the part after [`ALIAS_PREFIX`]).
pub trait AliasResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Result<String, UrlError>;
}

/// Current request with fixed values, e.g. from the config file or a test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticRequest {
    pub scheme: String,
    pub host: String,
    pub url: String,
}

impl StaticRequest {
    pub fn new(scheme: &str, host: &str, url: &str) -> Self {
        Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            url: url.to_string(),
        }
    }

    /// Derives scheme and host (with port) from an absolute URL.
    pub fn from_url(url: &str) -> Result<Self, UrlError> {
        let parts = parse_components(url)?;
        let host = match (parts.host.as_deref(), parts.port) {
            (Some(h), Some(p)) => format!("{h}:{p}"),
            (Some(h), None) => h.to_string(),
            (None, _) => return Err(UrlError::malformed(url)),
        };
        Ok(Self {
            scheme: parts.scheme.unwrap_or_default(),
            host,
            url: url.to_string(),
        })
    }
}

impl CurrentRequestProvider for StaticRequest {
    fn scheme(&self) -> String {
        self.scheme.clone()
    }

    fn host(&self) -> String {
        self.host.clone()
    }

    fn absolute_url(&self) -> String {
        self.url.clone()
    }
}

/// Token provider that hashes a secret with a counter and the wall clock.
pub struct DigestTokenProvider {
    param: String,
    secret: String,
    counter: AtomicU64,
}

impl DigestTokenProvider {
    pub fn new(param: &str, secret: &str) -> Self {
        Self {
            param: param.to_string(),
            secret: secret.to_string(),
            counter: AtomicU64::new(0),
        }
    }
}

impl fmt::Debug for DigestTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestTokenProvider")
            .field("param", &self.param)
            .finish_non_exhaustive()
    }
}

impl TokenProvider for DigestTokenProvider {
    fn param_name(&self) -> String {
        self.param.clone()
    }

    fn issue_token(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(n.to_be_bytes());
        hasher.update(nanos.to_be_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Alias lookup backed by a map. Unknown names pass through unchanged unless
/// `strict` is set.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<String, String>,
    strict: bool,
}

impl AliasTable {
    pub fn new(entries: HashMap<String, String>, strict: bool) -> Self {
        Self { entries, strict }
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.entries.insert(name.to_string(), value.to_string());
    }
}

impl AliasResolver for AliasTable {
    fn resolve(&self, name: &str) -> Result<String, UrlError> {
        match self.entries.get(name) {
            Some(v) => Ok(v.clone()),
            None if self.strict => Err(UrlError::UnknownAlias(name.to_string())),
            None => Ok(format!("{ALIAS_PREFIX}{name}")),
        }
    }
}

/// External collaborators bundled for injection into every model.
#[derive(Clone)]
pub struct Environment {
    pub request: Arc<dyn CurrentRequestProvider>,
    pub tokens: Option<Arc<dyn TokenProvider>>,
    pub aliases: Option<Arc<dyn AliasResolver>>,
}

impl Environment {
    pub fn new(request: impl CurrentRequestProvider + 'static) -> Self {
        Self {
            request: Arc::new(request),
            tokens: None,
            aliases: None,
        }
    }

    pub fn with_tokens(mut self, tokens: impl TokenProvider + 'static) -> Self {
        self.tokens = Some(Arc::new(tokens));
        self
    }

    pub fn with_aliases(mut self, aliases: impl AliasResolver + 'static) -> Self {
        self.aliases = Some(Arc::new(aliases));
        self
    }

    /// Resolves `@name` through the alias resolver; other strings are returned as is.
    pub fn resolve_alias(&self, value: &str) -> Result<String, UrlError> {
        match (value.strip_prefix(ALIAS_PREFIX), &self.aliases) {
            (Some(name), Some(aliases)) => aliases.resolve(name),
            _ => Ok(value.to_string()),
        }
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("request_host", &self.request.host())
            .field("tokens", &self.tokens.is_some())
            .field("aliases", &self.aliases.is_some())
            .finish()
    }
}
