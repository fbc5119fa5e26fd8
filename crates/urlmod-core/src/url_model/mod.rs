//! Mutable URL model.
//!
//! A [`UrlModel`] owns one [`UrlComponents`] record parsed from a source URL
//! (or from the current request when no source is given). Every mutator edits
//! that record in place and returns `&mut Self` so calls chain; rendering
//! works on a copy (see `render.rs`).

mod component;
mod parse;
mod path;
mod query;
mod render;
mod sanitize;

pub use component::{Component, ComponentValue, UrlComponents};
pub use parse::parse_components;
pub use path::normalize_path;
pub use query::{collapse_indexed_brackets, QueryParams, QueryValue};
pub use render::Mode;
pub use sanitize::strip_tags;

use std::collections::HashMap;

pub(crate) use component::parse_port;
use component::non_empty;
use path::join_paths;

use crate::config::UrlConfig;
use crate::error::UrlError;
use crate::provider::Environment;

#[derive(Debug, Clone)]
pub struct UrlModel {
    components: UrlComponents,
    config: UrlConfig,
    env: Environment,
}

impl UrlModel {
    /// Parses `source`, or the current URL when `source` is `None` or empty.
    ///
    /// The current URL is `config.current` (alias-resolved) when set, otherwise
    /// the request provider's absolute URL. A `@name` source is resolved
    /// through the alias resolver first.
    pub fn new(
        source: Option<&str>,
        config: UrlConfig,
        env: Environment,
    ) -> Result<Self, UrlError> {
        let source = match source.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => env.resolve_alias(s)?,
            None => current_url(&config, &env)?,
        };
        let components = parse_components(&source)?;
        tracing::debug!(source = %source, "url model constructed");
        Ok(Self {
            components,
            config,
            env,
        })
    }

    /// Model of the current request URL.
    pub fn current(config: UrlConfig, env: Environment) -> Result<Self, UrlError> {
        Self::new(None, config, env)
    }

    pub fn components(&self) -> &UrlComponents {
        &self.components
    }

    pub fn config(&self) -> &UrlConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut UrlConfig {
        &mut self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    // --- scalar components ---

    pub fn scheme(&self) -> Option<&str> {
        self.components.scheme.as_deref()
    }

    pub fn set_scheme(&mut self, scheme: &str) -> &mut Self {
        self.components.scheme = non_empty(scheme);
        self
    }

    pub fn host(&self) -> Option<&str> {
        self.components.host.as_deref()
    }

    pub fn set_host(&mut self, host: &str) -> &mut Self {
        self.components.host = non_empty(host);
        self
    }

    pub fn port(&self) -> Option<u16> {
        self.components.port
    }

    /// `None` or `Some(0)` clears the port.
    pub fn set_port(&mut self, port: impl Into<Option<u16>>) -> &mut Self {
        self.components.port = port.into().filter(|p| *p != 0);
        self
    }

    pub fn user(&self) -> Option<&str> {
        self.components.user.as_deref()
    }

    pub fn set_user(&mut self, user: &str) -> &mut Self {
        self.components.user = non_empty(user);
        self
    }

    pub fn pass(&self) -> Option<&str> {
        self.components.pass.as_deref()
    }

    pub fn set_pass(&mut self, pass: &str) -> &mut Self {
        self.components.pass = non_empty(pass);
        self
    }

    // --- path ---

    /// Normalized path.
    pub fn path(&self) -> Option<String> {
        self.components.path.as_deref().map(normalize_path)
    }

    pub fn set_path(&mut self, path: &str) -> &mut Self {
        self.components.path = non_empty(path);
        self
    }

    pub fn set_prefix_path(&mut self, prefix: &str) -> &mut Self {
        let current = self.components.path.as_deref().unwrap_or_default();
        self.components.path = non_empty(&join_paths(prefix, current));
        self
    }

    pub fn set_postfix_path(&mut self, postfix: &str) -> &mut Self {
        let current = self.components.path.as_deref().unwrap_or_default();
        self.components.path = non_empty(&join_paths(current, postfix));
        self
    }

    /// Literal substring replacement inside the path.
    pub fn replace_path(&mut self, search: &str, replace: &str) -> &mut Self {
        if search.is_empty() {
            return self;
        }
        if let Some(path) = self.components.path.take() {
            self.components.path = non_empty(&path.replace(search, replace));
        }
        self
    }

    // --- query ---

    /// Encoded query string, or `None` when there are no parameters.
    pub fn query(&self) -> Option<String> {
        self.components
            .query
            .as_ref()
            .filter(|q| !q.is_empty())
            .map(QueryParams::encode)
    }

    pub fn query_params(&self) -> Option<&QueryParams> {
        self.components.query.as_ref()
    }

    /// Accepts an encoded string or a decoded mapping; stored decoded.
    pub fn set_query(&mut self, query: impl Into<QueryParams>) -> &mut Self {
        self.set_query_params(query.into())
    }

    pub fn set_query_params(&mut self, params: QueryParams) -> &mut Self {
        self.components.query = Some(params).filter(|q| !q.is_empty());
        self
    }

    /// Merges `params` over the current query, then drops every falsy value
    /// (empty string, `"0"`, empty list) from the whole mapping.
    pub fn add_query_params(&mut self, params: impl Into<QueryParams>) -> &mut Self {
        let mut query = self.components.query.take().unwrap_or_default();
        query.merge(params.into());
        query.retain_truthy();
        self.components.query = Some(query).filter(|q| !q.is_empty());
        self
    }

    pub fn remove_query_params<I, K>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        if let Some(query) = self.components.query.as_mut() {
            for key in keys {
                query.remove(key.as_ref());
            }
            if query.is_empty() {
                self.components.query = None;
            }
        }
        self
    }

    pub fn remove_query(&mut self) -> &mut Self {
        self.components.query = None;
        self
    }

    // --- fragment ---

    pub fn fragment(&self) -> Option<&str> {
        self.components.fragment.as_deref()
    }

    pub fn set_fragment(&mut self, fragment: &str) -> &mut Self {
        self.components.fragment = non_empty(fragment);
        self
    }

    pub fn remove_fragment(&mut self) -> &mut Self {
        self.components.fragment = None;
        self
    }

    // --- bulk edits ---

    /// Substitutes each `{key}` token with its value in every textual
    /// component and in query values. Tokens are matched in one left-to-right
    /// pass and inserted text is not rescanned, so the result does not depend
    /// on the map's iteration order.
    pub fn replace(&mut self, placeholders: &HashMap<String, String>) -> &mut Self {
        if placeholders.is_empty() {
            return self;
        }
        let c = &mut self.components;
        for field in [
            &mut c.scheme,
            &mut c.host,
            &mut c.user,
            &mut c.pass,
            &mut c.path,
            &mut c.fragment,
        ] {
            if let Some(text) = field.take() {
                *field = non_empty(&substitute_placeholders(&text, placeholders));
            }
        }
        if let Some(query) = c.query.as_mut() {
            query.map_values(|text| substitute_placeholders(text, placeholders));
        }
        self
    }

    /// Runs `f` against the model; whatever it changes stays changed.
    pub fn callback(&mut self, f: impl FnOnce(&mut Self)) -> &mut Self {
        f(self);
        self
    }

    // --- index-style access ---

    pub fn get_component(&self, component: Component) -> Option<ComponentValue> {
        let c = &self.components;
        match component {
            Component::Scheme => c.scheme.clone().map(ComponentValue::Text),
            Component::Host => c.host.clone().map(ComponentValue::Text),
            Component::Port => c.port.map(ComponentValue::Port),
            Component::User => c.user.clone().map(ComponentValue::Text),
            Component::Pass => c.pass.clone().map(ComponentValue::Text),
            Component::Path => self.path().map(ComponentValue::Text),
            Component::Query => c.query.clone().map(ComponentValue::Query),
            Component::Fragment => c.fragment.clone().map(ComponentValue::Text),
        }
    }

    /// Sets a component from text. The port must be numeric; the query is
    /// decoded from its encoded form.
    pub fn set_component(
        &mut self,
        component: Component,
        value: &str,
    ) -> Result<&mut Self, UrlError> {
        match component {
            Component::Scheme => self.set_scheme(value),
            Component::Host => self.set_host(value),
            Component::Port => self.set_port(parse_port(value)?),
            Component::User => self.set_user(value),
            Component::Pass => self.set_pass(value),
            Component::Path => self.set_path(value),
            Component::Query => self.set_query(value),
            Component::Fragment => self.set_fragment(value),
        };
        Ok(self)
    }

    pub fn has_component(&self, component: Component) -> bool {
        self.get_component(component).is_some()
    }

    pub fn remove_component(&mut self, component: Component) -> &mut Self {
        let c = &mut self.components;
        match component {
            Component::Scheme => c.scheme = None,
            Component::Host => c.host = None,
            Component::Port => c.port = None,
            Component::User => c.user = None,
            Component::Pass => c.pass = None,
            Component::Path => c.path = None,
            Component::Query => c.query = None,
            Component::Fragment => c.fragment = None,
        }
        self
    }

    /// Present components as a JSON object, path normalized.
    pub fn to_plain_object(&self) -> serde_json::Map<String, serde_json::Value> {
        Component::ALL
            .into_iter()
            .filter_map(|component| {
                let value = serde_json::Value::from(self.get_component(component)?);
                Some((component.as_str().to_string(), value))
            })
            .collect()
    }
}

/// `{name}` tokens with an entry in `placeholders` are swapped for their
/// value; unknown tokens and stray braces are copied through.
fn substitute_placeholders(text: &str, placeholders: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let hit = after
            .find('}')
            .and_then(|close| placeholders.get(&after[..close]).map(|value| (close, value)));
        match hit {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn current_url(config: &UrlConfig, env: &Environment) -> Result<String, UrlError> {
    match config.current.as_deref().filter(|c| !c.is_empty()) {
        Some(current) => env.resolve_alias(current),
        None => Ok(env.request.absolute_url()),
    }
}
