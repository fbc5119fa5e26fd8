use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::provider::{AliasTable, DigestTokenProvider, Environment, StaticRequest};

/// Per-model options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlConfig {
    /// Returned when a render comes out empty.
    pub dummy: String,
    /// Remove `<...>` markup from rendered URLs.
    pub strip: bool,
    /// Overrides the request URL as the default source; may be an `@alias`.
    pub current: Option<String>,
    /// Reroute absolute links to hosts outside `allowed_domains`.
    pub protect: bool,
    /// Warning page used by `protect`; may be an `@alias`.
    pub protect_link: Option<String>,
    /// Exact host names trusted by `protect`. Empty = the current request host.
    pub allowed_domains: Vec<String>,
    /// Append a CSRF token parameter to every render.
    pub csrf: bool,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            dummy: "#".to_string(),
            strip: true,
            current: None,
            protect: false,
            protect_link: None,
            allowed_domains: Vec::new(),
            csrf: false,
        }
    }
}

/// Static description of the current request (`[request]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub url: String,
    /// Derived from `url` when unset.
    pub scheme: Option<String>,
    /// Derived from `url` when unset.
    pub host: Option<String>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost/".to_string(),
            scheme: None,
            host: None,
        }
    }
}

/// CSRF token settings (`[csrf]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsrfConfig {
    pub param: String,
    pub secret: String,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            param: "_csrf".to_string(),
            secret: String::new(),
        }
    }
}

/// Global configuration loaded from `~/.config/urlmod/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlmodConfig {
    /// Unknown `@alias` names fail instead of passing through.
    pub strict_aliases: bool,
    pub request: RequestConfig,
    pub url: UrlConfig,
    /// Optional; without it no token provider is configured.
    pub csrf: Option<CsrfConfig>,
    pub aliases: HashMap<String, String>,
}

impl UrlmodConfig {
    /// Builds the collaborators described by this file.
    pub fn environment(&self) -> Result<Environment> {
        let mut request = StaticRequest::from_url(&self.request.url)
            .with_context(|| format!("invalid [request] url: {}", self.request.url))?;
        if let Some(scheme) = &self.request.scheme {
            request.scheme = scheme.clone();
        }
        if let Some(host) = &self.request.host {
            request.host = host.clone();
        }

        let mut env = Environment::new(request);
        if let Some(csrf) = self.csrf.as_ref().filter(|c| !c.param.is_empty()) {
            env = env.with_tokens(DigestTokenProvider::new(&csrf.param, &csrf.secret));
        }
        if !self.aliases.is_empty() || self.strict_aliases {
            env = env.with_aliases(AliasTable::new(self.aliases.clone(), self.strict_aliases));
        }
        Ok(env)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("urlmod")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<UrlmodConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = UrlmodConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from a specific file.
pub fn load_from(path: &Path) -> Result<UrlmodConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: UrlmodConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
